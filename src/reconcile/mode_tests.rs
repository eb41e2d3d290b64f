//! Tests for mode resolution.

use super::{ResolvedMode, UsageError, resolve};
use crate::register::{Overlay, RegisterName};

fn touched() -> Overlay {
    Overlay::new().with(RegisterName::AltCfg, 0x07)
}

mod usage_errors {
    use super::*;

    #[test]
    fn both_modes_conflict() {
        assert_eq!(
            resolve(true, true, Overlay::new()),
            Err(UsageError::ConflictingModes)
        );
    }

    #[test]
    fn conflict_wins_over_overlay_checks() {
        assert_eq!(
            resolve(true, true, touched()),
            Err(UsageError::ConflictingModes)
        );
    }

    #[test]
    fn no_mode_selected() {
        assert_eq!(
            resolve(false, false, Overlay::new()),
            Err(UsageError::NoModeSelected)
        );
        assert_eq!(
            resolve(false, false, touched()),
            Err(UsageError::NoModeSelected)
        );
    }

    #[test]
    fn override_needs_fields() {
        assert_eq!(
            resolve(false, true, Overlay::new()),
            Err(UsageError::OverrideWithoutFields)
        );
    }

    #[test]
    fn override_rejects_preset_only_register() {
        let overlay = Overlay::new().with(RegisterName::IsLocked, 0x01);
        assert_eq!(
            resolve(false, true, overlay),
            Err(UsageError::NotSettable {
                field: RegisterName::IsLocked,
            })
        );
    }

    #[test]
    fn preset_only_register_rejected_among_settable_ones() {
        let overlay = touched().with(RegisterName::IsLocked, 0x00);
        let err = resolve(false, true, overlay).unwrap_err();

        assert_eq!(
            err,
            UsageError::NotSettable {
                field: RegisterName::IsLocked,
            }
        );
        assert!(err.to_string().starts_with("IsLocked cannot be set"));
    }

    #[test]
    fn empty_overlay_check_runs_first() {
        assert_eq!(
            resolve(false, true, Overlay::new()),
            Err(UsageError::OverrideWithoutFields)
        );
    }

    #[test]
    fn preset_rejects_fields_and_names_them() {
        let overlay = touched().with(RegisterName::CfgF, 0x00);
        assert_eq!(
            resolve(true, false, overlay),
            Err(UsageError::PresetWithFields {
                touched: vec![RegisterName::AltCfg, RegisterName::CfgF],
            })
        );
    }

    #[test]
    fn preset_with_fields_message_lists_registers() {
        let err = resolve(true, false, touched()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "preset mode cannot set register values (given: AltCfg)"
        );
    }
}

mod resolved {
    use super::*;

    #[test]
    fn preset_without_fields() {
        let mode = resolve(true, false, Overlay::new()).unwrap();
        assert_eq!(mode, ResolvedMode::Preset);
        assert!(!mode.reads_baseline());
        assert_eq!(mode.name(), "preset");
    }

    #[test]
    fn override_keeps_overlay() {
        let mode = resolve(false, true, touched()).unwrap();
        assert_eq!(mode, ResolvedMode::Override(touched()));
        assert!(mode.reads_baseline());
        assert_eq!(mode.to_string(), "override {AltCfg=07}");
    }
}

/// Every input combination maps to exactly one outcome.
#[test]
fn resolution_is_total() {
    for use_preset in [false, true] {
        for use_override in [false, true] {
            for non_empty in [false, true] {
                let overlay = if non_empty { touched() } else { Overlay::new() };
                let outcome = resolve(use_preset, use_override, overlay);

                let expected = match (use_preset, use_override, non_empty) {
                    (true, true, _) => Err(UsageError::ConflictingModes),
                    (false, false, _) => Err(UsageError::NoModeSelected),
                    (false, true, false) => Err(UsageError::OverrideWithoutFields),
                    (false, true, true) => Ok(ResolvedMode::Override(touched())),
                    (true, false, true) => Err(UsageError::PresetWithFields {
                        touched: vec![RegisterName::AltCfg],
                    }),
                    (true, false, false) => Ok(ResolvedMode::Preset),
                };
                assert_eq!(outcome, expected);
            }
        }
    }
}
