//! Command template rendering.
//!
//! A template is a configuration string holding one named placeholder. It is
//! substituted and then split on single spaces into an argument vector. The
//! substituted values (an IPv4 address or a MAC address) never contain a space.

use grindvakt_config::Placeholder;

/// Substitute `value` for `placeholder` and split into arguments.
pub fn render(template: &str, placeholder: Placeholder, value: &str) -> Vec<String> {
    template
        .replace(placeholder.token(), value)
        .split(' ')
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn renders_mac_rule() {
        let args = render(
            "-t mangle -I internet 1 -m mac --mac-source {mac_address} -j RETURN",
            Placeholder::MacAddress,
            "AA:BB:CC:DD:EE:FF",
        );
        assert_eq!(
            args,
            [
                "-t",
                "mangle",
                "-I",
                "internet",
                "1",
                "-m",
                "mac",
                "--mac-source",
                "AA:BB:CC:DD:EE:FF",
                "-j",
                "RETURN"
            ]
        );
    }

    #[test]
    fn every_occurrence_is_substituted() {
        let args = render(
            "-s {ip_address} -m comment --comment portal-{ip_address}",
            Placeholder::IpAddress,
            "10.0.0.7",
        );
        assert_eq!(
            args,
            ["-s", "10.0.0.7", "-m", "comment", "--comment", "portal-10.0.0.7"]
        );
    }

    #[test]
    fn other_placeholders_are_left_alone() {
        let args = render("{mac_address} {ip_address}", Placeholder::IpAddress, "10.0.0.7");
        assert_eq!(args, ["{mac_address}", "10.0.0.7"]);
    }

    #[test]
    fn split_is_strict() {
        assert_eq!(
            render("-c 1  {ip_address}", Placeholder::IpAddress, "10.0.0.1"),
            ["-c", "1", "", "10.0.0.1"]
        );
    }

    proptest! {
        #[test]
        fn argument_count_is_stable(
            words in prop::collection::vec("[a-z0-9-]{1,8}", 0..6),
            octets in any::<[u8; 4]>(),
        ) {
            let mut template = words.join(" ");
            if !template.is_empty() {
                template.push(' ');
            }
            template.push_str("{ip_address}");

            let ip = std::net::Ipv4Addr::from(octets).to_string();
            let args = render(&template, Placeholder::IpAddress, &ip);

            prop_assert_eq!(args.len(), words.len() + 1);
            prop_assert_eq!(args.last().map(String::as_str), Some(ip.as_str()));
            prop_assert_eq!(&args[..words.len()], &words[..]);
        }
    }
}
