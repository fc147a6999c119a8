use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn grindvakt() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("grindvakt"));
    cmd.env_remove("GRINDVAKT_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn request(remote_addr: &str, config: serde_json::Value) -> String {
    serde_json::json!({
        "environ": { "REMOTE_ADDR": remote_addr },
        "config": config,
    })
    .to_string()
}

fn portal_config() -> serde_json::Value {
    serde_json::json!({
        "debug": "False",
        "arping": "-c 1 -I eth0 {ip_address}",
        "iptables_mac": "-t mangle -I internet 1 -m mac --mac-source {mac_address} -j RETURN",
        "iptables_ip": "-t mangle -I internet 1 -s {ip_address} -j RETURN",
    })
}

#[test]
fn invalid_address_is_denied() {
    grindvakt()
        .arg("authorize")
        .write_stdin(request("999.1.1.1", portal_config()))
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""failed":true"#))
        .stdout(predicate::str::contains("invalid IPv4 address syntax"));
}

#[test]
fn incomplete_configuration_is_denied() {
    grindvakt()
        .arg("authorize")
        .write_stdin(request("10.0.0.7", serde_json::json!({ "arping": "{ip_address}" })))
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""failed":true"#))
        .stdout(predicate::str::contains("Configuration parsing error"))
        .stderr(predicate::str::contains("plugin configuration rejected"));
}

#[test]
fn malformed_request_is_an_error() {
    grindvakt()
        .arg("authorize")
        .write_stdin("not json")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("request is not a valid plugin request"));
}

#[cfg(unix)]
#[test]
fn mac_rule_through_stand_in_tools() {
    // `echo` plays the ARP prober and `true` the firewall manager.
    let config = serde_json::json!({
        "debug": "True",
        "arping": "Unicast reply from {ip_address} [AA:BB:CC:DD:EE:FF] 0.7ms",
        "arping_command": "echo",
        "iptables_mac": "-I internet -m mac --mac-source {mac_address} -j RETURN",
        "iptables_ip": "-I internet -s {ip_address} -j RETURN",
        "iptables_command": "true",
        "privilege_command": "",
    });

    grindvakt()
        .arg("authorize")
        .write_stdin(request("192.168.1.50", config))
        .assert()
        .success()
        .stdout(concat!(r#"{"error":null,"failed":false}"#, "\n"))
        .stderr(predicate::str::contains("found client hardware address"));
}

#[cfg(unix)]
#[test]
fn ip_rule_when_probe_fails() {
    let config = serde_json::json!({
        "debug": "False",
        "arping": "{ip_address}",
        "arping_command": "false",
        "iptables_mac": "--mac-source {mac_address}",
        "iptables_ip": "-s {ip_address}",
        "iptables_command": "true",
        "privilege_command": "",
    });

    grindvakt()
        .arg("authorize")
        .write_stdin(request("10.0.0.7", config))
        .assert()
        .success()
        .stdout(concat!(r#"{"error":"false exited with status 1","failed":false}"#, "\n"));
}

#[cfg(unix)]
#[test]
fn stray_space_in_arping_template_is_logged_not_fatal() {
    let config = serde_json::json!({
        "debug": "False",
        "arping": "-n  {ip_address}",
        "arping_command": "echo",
        "iptables_mac": "--mac-source {mac_address}",
        "iptables_ip": "-s {ip_address}",
        "iptables_command": "true",
        "privilege_command": "",
    });

    grindvakt()
        .arg("authorize")
        .write_stdin(request("10.0.0.7", config))
        .assert()
        .success()
        .stdout(concat!(
            r#"{"error":"no hardware address found for 10.0.0.7","failed":false}"#,
            "\n"
        ))
        .stderr(predicate::str::contains(
            "template splits into empty or whitespace arguments",
        ));
}

#[cfg(unix)]
#[test]
fn request_file_and_base_config() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("grindvakt.yaml");
    fs::write(
        &base,
        r#"
debug: false
arping: "{ip_address}"
arping_command: "false"
iptables_mac: "--mac-source {mac_address}"
iptables_ip: "-s {ip_address}"
iptables_command: "false"
privilege_command: ""
"#,
    )
    .unwrap();
    let req = dir.path().join("request.json");
    fs::write(&req, request("10.0.0.7", serde_json::json!({}))).unwrap();

    grindvakt()
        .arg("--config")
        .arg(&base)
        .arg("authorize")
        .arg("--request")
        .arg(&req)
        .assert()
        .failure()
        .stdout(concat!(r#"{"error":"false exited with status 1","failed":true}"#, "\n"));
}

#[test]
fn check_config_renders_commands() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("grindvakt.yaml");
    fs::write(
        &base,
        r#"
debug: false
arping: "-c 1 -I eth0 {ip_address}"
iptables_mac: "-t mangle -I internet 1 -m mac --mac-source {mac_address} -j RETURN"
iptables_ip: "-t mangle -I internet 1 -s {ip_address} -j RETURN"
"#,
    )
    .unwrap();

    grindvakt()
        .arg("check-config")
        .arg("--ip")
        .arg("10.0.0.7")
        .env("GRINDVAKT_CONFIG", &base)
        .assert()
        .success()
        .stdout(predicate::str::contains("debug: false"))
        .stdout(predicate::str::contains("arping: arping -c 1 -I eth0 10.0.0.7"))
        .stdout(predicate::str::contains(
            "iptables_mac: sudo iptables -t mangle -I internet 1 -m mac --mac-source 00:00:5e:00:53:01 -j RETURN",
        ))
        .stdout(predicate::str::contains(
            "iptables_ip: sudo iptables -t mangle -I internet 1 -s 10.0.0.7 -j RETURN",
        ));
}

#[test]
fn check_config_reports_validation_errors() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("grindvakt.yaml");
    fs::write(
        &base,
        r#"
debug: false
arping: "-c 1 {ip_address}"
iptables_mac: "-s {ip_address}"
iptables_ip: "-s {ip_address}"
"#,
    )
    .unwrap();

    grindvakt()
        .arg("--config")
        .arg(&base)
        .arg("check-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("iptables_mac"));
}
