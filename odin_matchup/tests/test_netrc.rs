/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

#![allow(unused)]

use odin_matchup::netrc::*;

// run with "cargo test --test test_netrc -- --nocapture"

#[test]
fn test_parse_netrc() {
    let text = "# credentials\nmachine urs.earthdata.nasa.gov login alice password s3cret\n\
                machine ftp.gportal.jaxa.jp\n  login bob\n  password pw2\n\
                default login anon password guest\n";
    let netrc = Netrc::parse( text);

    let c = netrc.authenticators("urs.earthdata.nasa.gov").unwrap();
    assert_eq!( (c.login.as_str(), c.password.as_str()), ("alice", "s3cret"));
    let c = netrc.authenticators("ftp.gportal.jaxa.jp").unwrap();
    assert_eq!( c.login, "bob");
    let c = netrc.authenticators("elsewhere").unwrap();
    assert_eq!( c.login, "anon");
}

#[test]
fn test_macdef_is_skipped() {
    let text = "macdef init\ncd /pub\nget file\n\nmachine host login u password p\n";
    let netrc = Netrc::parse( text);
    assert_eq!( netrc.authenticators("host").unwrap().password, "p");
    assert!( netrc.authenticators("cd").is_none());
}

#[test]
fn test_crlf_macdef_is_terminated() {
    let text = "macdef init\r\ncd /pub\r\nget file\r\n\r\nmachine host login u password p\r\n";
    let netrc = Netrc::parse( text);
    assert_eq!( netrc.authenticators("host").unwrap().login, "u");
    assert_eq!( netrc.authenticators("host").unwrap().password, "p");
}
