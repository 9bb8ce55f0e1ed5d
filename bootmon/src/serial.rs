/// Lists the serial ports the system currently knows about, for open-failure
/// diagnostics.
pub fn available_ports_hint() -> String {
    match serialport::available_ports() {
        Ok(ports) => {
            // On macOS, only use /dev/cu.* ports, not /dev/tty.* ports
            #[cfg(target_os = "macos")]
            let names: Vec<String> = ports
                .into_iter()
                .map(|p| p.port_name)
                .filter(|name| !name.starts_with("/dev/tty."))
                .collect();

            #[cfg(not(target_os = "macos"))]
            let names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();

            describe_ports(&names)
        }
        Err(e) => format!("Failed to get available ports list: {}", e),
    }
}

fn describe_ports(names: &[String]) -> String {
    format!(
        "Available ports: {}",
        if names.is_empty() {
            "No available ports".to_string()
        } else {
            names.join(", ")
        }
    )
}
