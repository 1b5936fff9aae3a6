//! Topic help beyond the clap-generated `--help`

use crate::{
    config::env::EnvManager,
    models::Target,
    probe::{Platform, ProbeCatalog},
};
use colored::*;

/// Topic help for the CLI application
pub struct HelpSystem {
    platform: Platform,
}

impl HelpSystem {
    pub const TOPICS: [&'static str; 4] = ["config", "env", "probes", "output"];

    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self { platform }
    }

    /// Help for one topic, `None` when the topic is unknown
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "config" | "configuration" => Some(self.format_configuration_help(use_colors)),
            "env" | "environment" => Some(self.format_environment_help(use_colors)),
            "probes" | "tools" => Some(self.format_probes_help(use_colors)),
            "output" | "report" => Some(self.format_output_help(use_colors)),
            _ => None,
        }
    }

    fn header(text: &str, use_colors: bool) -> String {
        if use_colors {
            text.bright_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::header("CONFIGURATION REFERENCE:", use_colors));

        help.push_str("CONFIGURATION PRIORITY (highest to lowest):\n");
        help.push_str("1. Command-line arguments\n");
        help.push_str("2. Environment variables\n");
        help.push_str("3. .env file values\n");
        help.push_str("4. Default values\n\n");

        help.push_str("PARAMETER LIMITS:\n");
        help.push_str("- Ping count: 1-100 echo requests\n");
        help.push_str("- Probe timeout: 1-600 seconds\n");
        help.push_str(&format!("- Concurrency: 1-{} targets at a time\n", crate::defaults::MAX_CONCURRENCY));
        help.push_str("- Targets: IP literals or hostnames, no whitespace, no leading '-'\n\n");

        help.push_str("DEFAULT TARGETS:\n");
        help.push_str(&format!("  {}\n", crate::defaults::DEFAULT_TARGETS.join(", ")));

        help
    }

    fn format_environment_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::header("ENVIRONMENT VARIABLES REFERENCE:", use_colors));

        help.push_str("SUPPORTED VARIABLES:\n");
        for (var_name, description, example) in EnvManager::get_supported_env_vars() {
            if use_colors {
                help.push_str(&format!(
                    "{}:\n  {}\n  Example: {}\n\n",
                    var_name.bright_yellow().bold(),
                    description,
                    example.bright_blue().italic()
                ));
            } else {
                help.push_str(&format!("{}:\n  {}\n  Example: {}\n\n", var_name, description, example));
            }
        }

        help.push_str("EXAMPLE .env FILE:\n");
        help.push_str(&EnvManager::create_example_env_content());

        help
    }

    fn format_probes_help(&self, use_colors: bool) -> String {
        let catalog = ProbeCatalog::new(self.platform);
        let target = Target::new("example.com");
        let title = format!("EXTERNAL TOOLS ({}):", self.platform.name());
        let mut help = format!("{}\n\n", Self::header(&title, use_colors));

        let mut commands = vec![
            ("IP configuration", catalog.ip_config().to_string()),
            ("WiFi state", catalog.wlan().to_string()),
            ("DNS lookup", catalog.dns_lookup(&target).to_string()),
            ("Ping", catalog.ping(&target, crate::defaults::DEFAULT_PING_COUNT).to_string()),
            ("Traceroute", catalog.traceroute(&target).to_string()),
        ];
        if let Some(adapters) = catalog.adapter_enumeration() {
            commands.push(("Adapters", adapters.to_string()));
        }

        for (label, command) in commands {
            help.push_str(&format!("  {:<18} {}\n", label, command));
        }

        help.push_str("\nA missing tool never stops the run; its section is reported as unavailable.\n");
        help.push_str("The speed test needs the Ookla CLI beside the executable or at --speedtest-path.\n");
        help
    }

    fn format_output_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", Self::header("OUTPUT REFERENCE:", use_colors));

        help.push_str("CONSOLE:\n");
        help.push_str("- Printed once after collection finishes, colored by latency rating\n");
        help.push_str("- Logs go to stderr (--verbose, --debug for JSON logs)\n\n");

        help.push_str("REPORT FILE:\n");
        help.push_str(&format!(
            "- Default {} beside the executable, overwritten every run\n",
            crate::defaults::DEFAULT_REPORT_FILE_NAME
        ));
        help.push_str("- Same values as the console plus raw tool output\n\n");

        help.push_str("LATENCY RATINGS (average ping round trip):\n");
        help.push_str("  up to 20ms Excellent, 40ms Good, 100ms Acceptable, 200ms Poor\n");
        help.push_str("  above 200ms or no replies at all is Bad\n\n");

        help.push_str("JSON:\n");
        help.push_str("- --json <PATH> writes the full summary alongside the report\n");
        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_topic_renders() {
        let help = HelpSystem::new();
        for topic in HelpSystem::TOPICS {
            let text = help.display_topic_help(topic, false);
            assert!(text.is_some(), "topic {} missing", topic);
        }
        assert!(help.display_topic_help("dns", false).is_none());
    }

    #[test]
    fn test_probe_commands_follow_platform() {
        let windows = HelpSystem::for_platform(Platform::Windows)
            .display_topic_help("probes", false)
            .unwrap();
        assert!(windows.contains("EXTERNAL TOOLS (Windows):"));
        assert!(windows.contains("ping -n 15 example.com"));
        assert!(windows.contains("Get-NetAdapter"));

        let linux = HelpSystem::for_platform(Platform::Linux)
            .display_topic_help("probes", false)
            .unwrap();
        assert!(linux.contains("traceroute -n -m 30 -w 1 example.com"));
        assert!(!linux.contains("Get-NetAdapter"));
    }

    #[test]
    fn test_configuration_help_lists_priority() {
        let text = HelpSystem::new().display_topic_help("CONFIG", false).unwrap();
        assert!(text.contains("1. Command-line arguments"));
        assert!(text.contains("8.8.8.8"));
    }

    #[test]
    fn test_color_formatting_differences() {
        let _guard = crate::testing::global_state_lock();
        colored::control::set_override(true);
        let colored_help = HelpSystem::new().display_topic_help("output", true).unwrap();
        colored::control::unset_override();
        let plain = HelpSystem::new().display_topic_help("output", false).unwrap();

        assert!(colored_help.contains("\x1b["));
        assert!(!plain.contains("\x1b["));
    }
}
