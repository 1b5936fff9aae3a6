//! Address extraction from nslookup answers

use std::net::IpAddr;

/// Addresses listed in the answer section of an nslookup run.
///
/// The server block before the first `Name:` line is skipped. Both the
/// Unix layout (one `Address:` line per record) and the Windows layout
/// (`Addresses:` followed by indented continuation lines) are understood.
/// Duplicates are dropped, order is preserved.
pub fn parse_resolved_addresses(text: &str) -> Vec<IpAddr> {
    let mut addresses: Vec<IpAddr> = Vec::new();
    let mut in_answer = false;
    let mut in_address_list = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            in_address_list = false;
            continue;
        }

        let (key, value) = match trimmed.split_once(':') {
            Some((key, value)) if is_record_key(key) => (Some(key.trim()), value.trim()),
            _ => (None, trimmed),
        };

        match key {
            Some("Name") => {
                in_answer = true;
                in_address_list = false;
            }
            Some("Address") | Some("Addresses") if in_answer => {
                in_address_list = true;
                push_address(&mut addresses, value);
            }
            Some(_) => in_address_list = false,
            None if in_address_list && line.starts_with(char::is_whitespace) => {
                push_address(&mut addresses, value);
            }
            None => in_address_list = false,
        }
    }

    addresses
}

/// A key is a single word; IPv6 literals also contain colons
fn is_record_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic() || c == ' ' || c == '-')
}

fn push_address(addresses: &mut Vec<IpAddr>, value: &str) {
    // Unix resolvers print the server as `127.0.0.53#53`
    let candidate = value.split('#').next().unwrap_or(value).trim();
    if let Ok(address) = candidate.parse::<IpAddr>() {
        if !addresses.contains(&address) {
            addresses.push(address);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINUX_NSLOOKUP: &str = "Server:\t\t127.0.0.53
Address:\t127.0.0.53#53

Non-authoritative answer:
Name:\tgithub.com
Address: 140.82.121.4
Name:\tgithub.com
Address: 140.82.121.3
";

    const WINDOWS_NSLOOKUP: &str = "Server:  dns.google\r
Address:  8.8.8.8\r
\r
Non-authoritative answer:\r
Name:    amazon.com\r
Addresses:  52.94.236.248\r
          205.251.242.103\r
          54.239.28.85\r
\r
";

    const NXDOMAIN: &str = "Server:\t\t127.0.0.53
Address:\t127.0.0.53#53

** server can't find no-such-host.invalid: NXDOMAIN
";

    #[test]
    fn test_linux_answer_section() {
        let addresses = parse_resolved_addresses(LINUX_NSLOOKUP);
        let expected: Vec<IpAddr> = vec!["140.82.121.4".parse().unwrap(), "140.82.121.3".parse().unwrap()];
        assert_eq!(addresses, expected);
    }

    #[test]
    fn test_windows_continuation_lines() {
        let addresses = parse_resolved_addresses(WINDOWS_NSLOOKUP);
        assert_eq!(addresses.len(), 3);
        assert_eq!(addresses[2], "54.239.28.85".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_server_address_is_skipped() {
        let addresses = parse_resolved_addresses(WINDOWS_NSLOOKUP);
        assert!(!addresses.contains(&"8.8.8.8".parse::<IpAddr>().unwrap()));
    }

    #[test]
    fn test_nxdomain_has_no_addresses() {
        assert!(parse_resolved_addresses(NXDOMAIN).is_empty());
    }

    #[test]
    fn test_ipv6_answer() {
        let text = "Non-authoritative answer:\nName:\texample.com\nAddress: 2606:2800:220:1:248:1893:25c8:1946\n";
        let addresses = parse_resolved_addresses(text);
        assert_eq!(addresses.len(), 1);
        assert!(addresses[0].is_ipv6());
    }
}
