use tracing::warn;

use crate::utils;

use super::{Children, Manifest, Node};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Characters in a value that force it to be wrapped in double quotes.
const QUOTED_CHARS: &[char] = &['"', ':', '(', ')', '[', ']', ' ', '\t', '\n'];

/// Lower bound (exclusive) accepted for the NTP poll-min exponent.
const NTP_POLL_MIN_FLOOR: i64 = 3;

/// Upper bound (exclusive) accepted for the NTP poll-max exponent.
const NTP_POLL_MAX_CEILING: i64 = 18;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Manifest {
    /// Renders the manifest into the text document the boot loader consumes.
    ///
    /// Sections appear in a fixed order: boot filesystem (with resolved klib
    /// binaries), root filesystem, program, klib directives, arguments,
    /// debug flags, no-trace list, environment, mounts, and network
    /// configuration. All map-backed collections iterate in key order, so
    /// the output is bit-reproducible for identical inputs.
    ///
    /// Requested klibs missing from the klib directory are reported and
    /// omitted; they never fail the render.
    pub fn render(&self) -> String {
        let mut sb = String::new();
        sb.push_str("(\n");

        // boot fs
        if !self.get_boot().is_empty() {
            sb.push_str("boot:(children:(\n");
            write_nodes(&mut sb, self.get_boot(), 4);

            // include requested klibs found in the klib directory
            if !self.get_klibs().is_empty() {
                let klibs_path = match self.get_klibs_dir() {
                    Some(dir) => dir.clone(),
                    None => utils::klibs_dir(*self.get_nightly()),
                };
                if klibs_path.exists() {
                    sb.push_str("    klib:(children:(\n");

                    let mut klib_nodes = Children::new();
                    for name in self.get_klibs() {
                        let klib_path = klibs_path.join(name);
                        if klib_path.exists() {
                            klib_nodes.insert(name.clone(), Node::File(klib_path));
                        } else {
                            warn!(
                                "klib {} not found in directory {}",
                                name,
                                klibs_path.display()
                            );
                        }
                    }
                    write_nodes(&mut sb, &klib_nodes, 6);

                    sb.push_str("    ))\n");
                } else {
                    warn!("klibs directory with path {} not found", klibs_path.display());
                }
            }

            sb.push_str("))\n");
        }

        // root fs
        sb.push_str("children:(\n");
        write_nodes(&mut sb, self.get_root(), 4);
        sb.push_str(")\n");

        // program
        if let Some(program) = self.get_program() {
            sb.push_str("program:");
            sb.push_str(program.as_str());
            sb.push('\n');
        }

        // klib activation and derived NTP directives
        if !self.get_klibs().is_empty() {
            sb.push_str("klibs:bootfs\n");

            if self.get_klibs().iter().any(|klib| klib == "ntp") {
                self.write_ntp_directives(&mut sb);
            }
        }

        // arguments
        sb.push_str("arguments:[");
        let escaped_args = self
            .get_args()
            .iter()
            .map(|arg| escape_value(arg))
            .collect::<Vec<_>>();
        sb.push_str(&escaped_args.join(" "));
        sb.push_str("]\n");

        // debug flags
        for (name, value) in self.get_debug_flags() {
            sb.push_str(name);
            sb.push(':');
            sb.push(*value);
            sb.push('\n');
        }

        // notrace
        if !self.get_no_trace().is_empty() {
            sb.push_str("notrace:[");
            sb.push_str(&self.get_no_trace().join(" "));
            sb.push_str("]\n");
        }

        // environment
        sb.push_str("environment:(");
        let environment = self
            .get_environment()
            .iter()
            .map(|(name, value)| format!("{}:{}", name, escape_value(value)))
            .collect::<Vec<_>>();
        sb.push_str(&environment.join(" "));
        sb.push_str(")\n");

        // mounts
        if !self.get_mounts().is_empty() {
            sb.push_str("mounts:(\n");
            for (label, path) in self.get_mounts() {
                sb.push_str("    ");
                sb.push_str(label);
                sb.push(':');
                sb.push_str(path);
                sb.push('\n');
            }
            sb.push_str(")\n");
        }

        // network
        if let Some(network_config) = self.get_network_config() {
            sb.push_str("ipaddr:");
            sb.push_str(network_config.get_ip());
            sb.push_str("\ngateway:");
            sb.push_str(network_config.get_gateway());
            sb.push_str("\nnetmask:");
            sb.push_str(network_config.get_netmask());
            sb.push('\n');
        }

        sb.push_str(")\n");
        sb
    }

    /// Emits the NTP directives derived from the environment.
    ///
    /// The poll exponents are validated (`min > 3`, `max < 18`); when both
    /// values parse but `min > max` the pair would describe an invalid
    /// range, so both are dropped.
    fn write_ntp_directives(&self, sb: &mut String) {
        let environment = self.get_environment();

        let address = environment.get("ntpAddress");
        let port = environment.get("ntpPort");

        let min_value = environment.get("ntpPollMin");
        let max_value = environment.get("ntpPollMax");
        let parsed_min = min_value.and_then(|value| value.parse::<i64>().ok());
        let parsed_max = max_value.and_then(|value| value.parse::<i64>().ok());

        let mut poll_min = match parsed_min {
            Some(number) if number > NTP_POLL_MIN_FLOOR => min_value,
            _ => None,
        };
        let mut poll_max = match parsed_max {
            Some(number) if number < NTP_POLL_MAX_CEILING => max_value,
            _ => None,
        };

        if let (Some(min), Some(max)) = (parsed_min, parsed_max) {
            if min > max {
                poll_min = None;
                poll_max = None;
            }
        }

        if let Some(address) = address {
            if !address.is_empty() {
                sb.push_str(&format!("ntp_address:{}\n", address));
            }
        }

        if let Some(port) = port {
            if !port.is_empty() {
                sb.push_str(&format!("ntp_port:{}\n", port));
            }
        }

        if let Some(poll_min) = poll_min {
            sb.push_str(&format!("ntp_poll_min:{}\n", poll_min));
        }

        if let Some(poll_max) = poll_max {
            sb.push_str(&format!("ntp_poll_max:{}\n", poll_max));
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Escapes a leaf value for the manifest format.
///
/// Double quotes are backslash-escaped, and any value containing a quote,
/// colon, parenthesis, bracket, or whitespace is wrapped in double quotes.
/// Values without special characters are returned unchanged.
pub fn escape_value(value: &str) -> String {
    let mut escaped = if value.contains('"') {
        value.replace('"', "\\\"")
    } else {
        value.to_string()
    };

    if value.contains(QUOTED_CHARS) {
        escaped = format!("\"{}\"", escaped);
    }

    escaped
}

/// Renders one tree level, recursing into directories one indent step
/// deeper. Children iterate in segment order.
fn write_nodes(sb: &mut String, children: &Children, indent: usize) {
    for (segment, node) in children {
        sb.push_str(&" ".repeat(indent));

        match node {
            Node::Link(target) => {
                sb.push_str(&escape_value(segment));
                sb.push_str(":(linktarget:");
                sb.push_str(&escape_value(target));
                sb.push_str(")\n");
            }
            Node::File(host_path) => {
                sb.push_str(&escape_value(segment));
                sb.push_str(":(contents:(host:");
                sb.push_str(&escape_value(&host_path.to_string_lossy()));
                sb.push_str("))\n");
            }
            Node::Directory(entries) => {
                sb.push_str(segment);
                sb.push_str(":(children:(");
                if !entries.is_empty() {
                    sb.push('\n');
                    write_nodes(sb, entries, indent + 4);
                    sb.push_str(&" ".repeat(indent));
                }
                sb.push_str("))\n");
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
