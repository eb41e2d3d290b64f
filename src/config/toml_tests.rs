//! Tests for TOML configuration parsing.

use super::toml::{RegisterValue, TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.device.path.is_none());
        assert!(config.device.image.is_none());
        assert!(!config.mode.prequired);
        assert!(!config.mode.use_override);
        assert!(config.registers.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [device]
            path = "/dev/tpm0"

            [mode]
            override = true

            [registers]
            AltCfg = "0x07"
            CFG_A = 254
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.device.path.as_deref(), Some("/dev/tpm0"));
        assert!(config.mode.use_override);
        assert!(!config.mode.prequired);
        assert_eq!(
            config.registers.get("AltCfg"),
            Some(&RegisterValue::Text("0x07".to_string()))
        );
        assert_eq!(
            config.registers.get("CFG_A"),
            Some(&RegisterValue::Integer(254))
        );
    }

    #[test]
    fn parse_image_device() {
        let toml = r#"
            [device]
            image = "registers.json"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(config.device.image.as_deref(), Some("registers.json"));
    }

    #[test]
    fn unknown_section_is_rejected() {
        let result = TomlConfig::parse("[logging]\nlevel = \"debug\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_mode_key_is_rejected() {
        let result = TomlConfig::parse("[mode]\nforce = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_syntax_is_rejected() {
        let result = TomlConfig::parse("[mode\n");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse TOML")
        );
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert!(!config.mode.prequired);
        assert!(!config.mode.use_override);
        assert!(config.registers.is_empty());
    }

    #[test]
    fn default_template_mentions_every_section() {
        let template = default_config_template();
        assert!(template.contains("[device]"));
        assert!(template.contains("[mode]"));
        assert!(template.contains("[registers]"));
    }
}

mod file_loading {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[mode]\nprequired = true").unwrap();

        let config = TomlConfig::load(file.path()).unwrap();
        assert!(config.mode.prequired);
    }

    #[test]
    fn load_missing_file_fails() {
        let result = TomlConfig::load(std::path::Path::new("/nonexistent/ntc2.toml"));
        assert!(result.unwrap_err().to_string().contains("Failed to read"));
    }
}
