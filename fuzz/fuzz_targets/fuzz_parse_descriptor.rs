#![no_main]

use bolt_client::client::ConnectionInfo;
use bolt_client::{with_connection_string, with_host_port, with_basic_auth, Client};
use libfuzzer_sys::arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;

#[derive(Debug)]
struct DescriptorInput {
    raw: String,
    host: String,
    port: i32,
    user: String,
    password: String,
}

impl<'a> Arbitrary<'a> for DescriptorInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> libfuzzer_sys::arbitrary::Result<Self> {
        Ok(Self {
            raw: u.arbitrary()?,
            host: u.arbitrary()?,
            port: u.arbitrary()?,
            user: u.arbitrary()?,
            password: u.arbitrary()?,
        })
    }
}

fuzz_target!(|input: DescriptorInput| {
    let _ = ConnectionInfo::parse(&input.raw);
    let _ = Client::new([with_connection_string(input.raw)]);

    if let Ok(client) = Client::new([
        with_host_port(input.host, input.port),
        with_basic_auth(input.user, input.password),
    ]) {
        let _ = ConnectionInfo::parse(client.descriptor().as_str());
        let _ = client.descriptor().redacted();
    }
});
