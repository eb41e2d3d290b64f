//! Tests for the run module.

use std::path::Path;

use ntc2_preconfig::config::Cli;
use ntc2_preconfig::register::RegisterName;
use tempfile::tempdir;

use super::*;

fn config(args: &[&str]) -> ValidatedConfig {
    let mut full_args = vec!["ntc2-preconfig"];
    full_args.extend(args);
    ValidatedConfig::from_raw(&Cli::parse_from_iter(full_args), None).unwrap()
}

fn seed_image(path: &Path, registers: &RegisterSet) {
    ImageDevice::new(path).submit_config(registers).unwrap();
}

fn read_image(path: &Path) -> RegisterSet {
    ImageDevice::new(path).read_config().unwrap()
}

mod execute_image {
    use super::*;

    #[test]
    fn preset_writes_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        let path_str = path.to_str().unwrap();

        let report = execute(config(&["--prequired", "--image", path_str])).unwrap();

        assert!(report.submitted);
        assert_eq!(read_image(&path), RegisterSet::preset());
    }

    #[test]
    fn override_updates_one_register() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        let path_str = path.to_str().unwrap();
        seed_image(&path, &RegisterSet::preset());

        let report = execute(config(&[
            "--override",
            "--set",
            "AltCfg=07",
            "--image",
            path_str,
        ]))
        .unwrap();

        assert_eq!(report.changes.len(), 1);
        assert_eq!(
            read_image(&path),
            RegisterSet::preset().with(RegisterName::AltCfg, 0x07)
        );
    }

    #[test]
    fn dry_run_leaves_image_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        let path_str = path.to_str().unwrap();
        seed_image(&path, &RegisterSet::preset());

        let report = execute(config(&[
            "--override",
            "--set",
            "CFG_A=00",
            "--dry-run",
            "--image",
            path_str,
        ]))
        .unwrap();

        assert!(!report.submitted);
        assert_eq!(read_image(&path), RegisterSet::preset());
    }

    #[test]
    fn violation_leaves_image_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        let path_str = path.to_str().unwrap();
        seed_image(&path, &RegisterSet::preset());

        let error = execute(config(&[
            "--override",
            "--set",
            "PullUp=00",
            "--image",
            path_str,
        ]))
        .unwrap_err();

        assert_eq!(error.exit_status(), exit_code::VIOLATION);
        assert_eq!(read_image(&path), RegisterSet::preset());
    }

    #[test]
    fn missing_baseline_image_is_transport_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let path_str = path.to_str().unwrap();

        let error = execute(config(&[
            "--override",
            "--set",
            "AltCfg=07",
            "--image",
            path_str,
        ]))
        .unwrap_err();

        assert_eq!(error.exit_status(), exit_code::TRANSPORT_ERROR);
        assert!(!path.exists());
    }

    #[test]
    fn usage_error_is_exit_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        let path_str = path.to_str().unwrap();

        let error = execute(config(&["--image", path_str])).unwrap_err();

        assert_eq!(error.exit_status(), exit_code::CONFIG_ERROR);
        assert!(!path.exists());
    }
}

mod status_table {
    use super::*;

    #[test]
    fn statuses_are_distinct_and_ordered() {
        assert_eq!(
            [
                exit_code::SUCCESS,
                exit_code::CONFIG_ERROR,
                exit_code::TRANSPORT_ERROR,
                exit_code::VIOLATION,
            ],
            [0, 1, 2, 3]
        );
    }

    #[test]
    fn lock_register_override_is_usage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        seed_image(&path, &RegisterSet::preset());
        let mut device = ImageDevice::new(&path);
        let mut config = config(&["--override"]);
        config.request.overlay.set(RegisterName::IsLocked, 0x01);

        let error = execute_with(&mut device, config).unwrap_err();

        assert_eq!(error.exit_status(), exit_code::CONFIG_ERROR);
        assert_eq!(read_image(&path), RegisterSet::preset());
    }
}

mod open {
    use super::*;

    #[test]
    fn missing_tpm_device_fails() {
        let dir = tempdir().unwrap();
        let target = DeviceTarget::Tpm(dir.path().join("tpm-missing"));

        let result = open_device(&target);

        let Err(error) = result else {
            panic!("expected open failure");
        };
        assert!(matches!(error, RunError::Open { .. }));
        assert_eq!(error.exit_status(), exit_code::TRANSPORT_ERROR);
        assert!(error.to_string().contains("tpm:"));
    }

    #[test]
    fn show_reads_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        seed_image(&path, &RegisterSet::preset());

        let registers = show(&DeviceTarget::Image(path)).unwrap();

        assert_eq!(registers, RegisterSet::preset());
    }

    #[test]
    fn show_missing_image_is_read_error() {
        let dir = tempdir().unwrap();
        let result = show(&DeviceTarget::Image(dir.path().join("none.json")));

        assert!(matches!(result, Err(RunError::Read(_))));
    }
}

mod rendering {
    use super::*;

    #[test]
    fn registers_list_every_field() {
        let text = render_registers(&RegisterSet::preset());

        assert_eq!(text.lines().count(), RegisterName::ALL.len());
        assert!(text.contains("IsValid"));
        assert!(!text.contains("MISMATCH"));
    }

    #[test]
    fn registers_flag_fixed_mismatch() {
        let set = RegisterSet::preset().with(RegisterName::CfgI, 0x00);
        let text = render_registers(&set);

        let line = text.lines().find(|l| l.starts_with("CFG_I")).unwrap();
        assert!(line.contains("MISMATCH (required ff)"));
    }

    #[test]
    fn report_is_one_line_per_item() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        let path_str = path.to_str().unwrap();
        seed_image(&path, &RegisterSet::preset());

        let report = execute(config(&[
            "--override",
            "--set",
            "AltCfg=07",
            "--set",
            "CFG_A=00",
            "--image",
            path_str,
        ]))
        .unwrap();
        let text = render_report(&report);

        assert_eq!(
            text,
            "Mode: override\n  AltCfg: 03 -> 07\n  CFG_A: fe -> 00\nConfiguration written\n"
        );
    }

    #[test]
    fn report_mentions_dry_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        let path_str = path.to_str().unwrap();

        let report = execute(config(&["--prequired", "--dry-run", "--image", path_str])).unwrap();
        let text = render_report(&report);

        assert!(text.contains("Mode: preset"));
        assert!(text.contains("Dry run"));
    }

    #[test]
    fn report_lists_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regs.json");
        let path_str = path.to_str().unwrap();
        seed_image(&path, &RegisterSet::preset());

        let report = execute(config(&[
            "--override",
            "--set",
            "AltCfg=07",
            "--image",
            path_str,
        ]))
        .unwrap();
        let text = render_report(&report);

        assert!(text.contains("AltCfg: 03 -> 07"));
        assert!(text.contains("Configuration written"));
    }
}
