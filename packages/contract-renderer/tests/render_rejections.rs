//! Inputs the renderer refuses
//!
//! Every rejection aborts the whole render, so these only look at the returned error.

mod common;

use common::*;
use contract_renderer::errors::VersionIssue;
use contract_renderer::{ErrorCategory, ImportViolation, RenderError};

// ═══════════════════════════════════════════════════════════════════════════
// Import policy
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_wildcard_import_from_capability_rejected() {
    let project = ContractProject::new().template(concat!(
        "from contracts_api import *\n",
        "api = \"4.0.0\"\n",
    ));

    let err = project.render().unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(
        err.violation(),
        Some(&ImportViolation::Wildcard {
            module: "contracts_api".to_string()
        })
    );
    let message = err.to_string();
    assert!(message.contains("'*'"), "{message}");
    assert!(message.contains("contracts_api"), "{message}");
    assert!(message.contains("template.py:1:"), "{message}");
}

#[test]
fn test_non_whitelisted_from_import_rejected() {
    let project = ContractProject::new().template(concat!(
        "from os import path\n",
        "api = \"4.0.0\"\n",
    ));

    let err = project.render().unwrap_err();

    assert_eq!(
        err.violation(),
        Some(&ImportViolation::NotWhitelisted {
            module: "os".to_string()
        })
    );
}

#[test]
fn test_reserved_capability_needs_from_import() {
    let project = ContractProject::new().template("import contracts_api\napi = \"4.0.0\"\n");

    let err = project.render().unwrap_err();

    assert!(matches!(
        err.violation(),
        Some(ImportViolation::ReservedCapability { module }) if module == "contracts_api"
    ));
}

#[test]
fn test_violation_inside_feature_module_points_at_feature() {
    let project = ContractProject::new()
        .template(&template_importing(&["fees"], "\nx = fees.RATE\n"))
        .file("lib/fees.py", "RATE = 1\nfrom datetime import timedelta\n");

    let err = project.render().unwrap_err();

    match err {
        RenderError::DisallowedImport {
            location,
            statement,
            violation,
        } => {
            assert!(location.path.ends_with("lib/fees.py"));
            assert_eq!(location.line, 2);
            assert_eq!(statement, "from datetime import timedelta");
            assert_eq!(
                violation,
                ImportViolation::SymbolNotAllowed {
                    module: "datetime".to_string(),
                    symbol: "timedelta".to_string()
                }
            );
        }
        other => panic!("unexpected error {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Structure
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_feature_import_without_alias_rejected() {
    let project = ContractProject::new()
        .template("import lib.fees\napi = \"4.0.0\"\n")
        .file("lib/fees.py", "RATE = 1\n");

    let err = project.render().unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Structural);
    assert!(matches!(err, RenderError::MissingAlias { ref module, .. } if module == "lib.fees"));
}

#[test]
fn test_import_cycle_rejected() {
    let project = ContractProject::new()
        .template(&template_importing(&["a"], "\nx = a.run()\n"))
        .file("lib/a.py", "import lib.b as b\n\ndef run():\n    return b.run()\n")
        .file("lib/b.py", "import lib.a as a\n\ndef run():\n    return a.run()\n");

    let err = project.render().unwrap_err();

    match err {
        RenderError::ImportCycle { modules } => {
            assert!(modules.contains(&"lib.a".to_string()), "{modules:?}");
            assert!(modules.contains(&"lib.b".to_string()), "{modules:?}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_tuple_assignment_in_feature_rejected() {
    let project = ContractProject::new()
        .template(&template_importing(&["fees"], "\nx = fees.low\n"))
        .file("lib/fees.py", "low, high = 1, 2\n");

    let err = project.render().unwrap_err();

    assert!(matches!(err, RenderError::UnsupportedTargetShape { ref shape, .. } if shape == "Tuple"));
}

#[test]
fn test_unknown_feature_module_rejected() {
    let project = ContractProject::new()
        .template(&template_importing(&["missing"], "\nx = missing.VALUE\n"));

    let err = project.render().unwrap_err();

    assert!(matches!(err, RenderError::UnresolvableModule { ref module, .. } if module == "lib.missing"));
}

#[test]
fn test_non_literal_directive_argument_rejected() {
    let project = ContractProject::new().template(concat!(
        "from contracts_api import requires\n",
        "api = \"4.0.0\"\n",
        "\n",
        "def event_name():\n",
        "    return \"ACCRUE\"\n",
        "\n",
        "@requires(event_type=event_name(), parameters=True)\n",
        "def scheduled_event_hook(vault, hook_arguments):\n",
        "    return None\n",
    ));

    let err = project.render().unwrap_err();

    match err {
        RenderError::NonLiteralDirectiveArgument {
            directive,
            function,
            keyword,
            location,
        } => {
            assert_eq!(directive, "requires");
            assert_eq!(function, "scheduled_event_hook");
            assert_eq!(keyword, "event_type");
            assert_eq!(location.line, 7);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_metadata_name_is_not_a_foldable_constant() {
    let project = ContractProject::new().template(concat!(
        "from contracts_api import requires\n",
        "api = \"4.0.0\"\n",
        "version = \"1.2.0\"\n",
        "\n",
        "@requires(event_type=version)\n",
        "def scheduled_event_hook(vault, hook_arguments):\n",
        "    return None\n",
    ));

    let err = project.render().unwrap_err();

    assert!(matches!(
        err,
        RenderError::NonLiteralDirectiveArgument { ref keyword, .. } if keyword == "event_type"
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// Version
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_api_declaration_rejected() {
    let project = ContractProject::new().template("version = \"1.0.0\"\n");

    let err = project.render().unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Version);
    assert!(matches!(
        err,
        RenderError::UnsupportedVersion {
            issue: VersionIssue::MissingApi,
            ..
        }
    ));
}

#[test]
fn test_older_api_major_rejected() {
    let project = ContractProject::new().template("api = \"3.12.0\"\n");

    let err = project.render().unwrap_err();

    match err {
        RenderError::UnsupportedVersion {
            issue: VersionIssue::UnsupportedMajor { found, supported },
            ..
        } => {
            assert_eq!(found, "3.12.0");
            assert_eq!(supported, 4);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_supported_major_is_configurable() {
    let project = ContractProject::new().template("api = \"3.12.0\"\n");
    let config = project.config().supported_api_major(3).build().unwrap();

    assert!(project.render_with(config).is_ok());
}

// ═══════════════════════════════════════════════════════════════════════════
// Environment
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_template_is_an_io_error() {
    let project = ContractProject::new();

    let err = project.render().unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Environment);
    assert!(matches!(err, RenderError::Io { .. }));
}

#[test]
fn test_template_with_syntax_error_reported() {
    let project = ContractProject::new().template("api = \"4.0.0\"\ndef broken(:\n");

    let err = project.render().unwrap_err();

    match err {
        RenderError::Parse { location } => assert_eq!(location.line, 2),
        other => panic!("unexpected error {other:?}"),
    }
}
