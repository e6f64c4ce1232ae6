//! Round-trip properties of rendered contracts
//!
//! The rendered file must itself be a valid module with one binding per top-level name, and
//! rendering must be a pure function of the inputs.

#[path = "../common/mod.rs"]
mod common;

use common::*;
use contract_renderer::{render, RenderError};
use pretty_assertions::assert_eq;
use std::fs;

fn wallet_project() -> ContractProject {
    ContractProject::new()
        .template(concat!(
            "from contracts_api import Tside, requires\n",
            "from decimal import Decimal\n",
            "import lib.fees as fees\n",
            "import lib.limits as limits\n",
            "api = \"4.0.0\"\n",
            "version = \"1.0.0\"\n",
            "tside = Tside.LIABILITY\n",
            "\n",
            "\n",
            "@requires(parameters=True, event_type=fees.EVENT)\n",
            "def scheduled_event_hook(vault, hook_arguments):\n",
            "    amount = fees.charge(Decimal(\"10\"))\n",
            "    return limits.clamp(amount)\n",
        ))
        .file(
            "lib/fees.py",
            concat!(
                "from decimal import Decimal\n",
                "import lib.limits as limits\n",
                "\n",
                "EVENT = \"APPLY_FEES\"\n",
                "\n",
                "\n",
                "def charge(amount: Decimal) -> Decimal:\n",
                "    return limits.clamp(amount * Decimal(\"0.1\"))\n",
                "\n",
                "\n",
                "def refund(amount):\n",
                "    return -amount\n",
            ),
        )
        .file(
            "lib/limits.py",
            concat!(
                "from decimal import Decimal\n",
                "\n",
                "MAXIMUM = Decimal(\"100\")\n",
                "\n",
                "\n",
                "def clamp(amount):\n",
                "    return min(amount, MAXIMUM)\n",
            ),
        )
}

// ═══════════════════════════════════════════════════════════════════════════
// Output validity
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rendered_contract_reparses() {
    let source = wallet_project().render().unwrap().source;

    assert_parses(&source);
    assert_unique_top_level_names(&source);
    assert_absent(&source, "import lib.");
    assert_absent(&source, "fees_refund");
    assert!(source.contains("@requires(parameters=True, event_type=\"APPLY_FEES\")"));
}

#[test]
fn test_rendered_contract_is_a_fixed_point() {
    // Rendering the output again only adds its own header
    let project = wallet_project();
    let first = project.render().unwrap().source;

    let again = ContractProject::new().template(&first);
    let config = again
        .config()
        .render_metadata_at_top_of_file(false)
        .build()
        .unwrap();
    let second = again.render_with(config).unwrap().source;

    let names = top_level_names(&first);
    assert_eq!(top_level_names(&second), names);
}

#[test]
fn test_render_is_deterministic() {
    let project = wallet_project();
    let config = project.config().build().unwrap();

    let first = render(project.template_path(), config.clone()).unwrap();
    let second = render(project.template_path(), config).unwrap();

    assert_eq!(first.source, second.source);
    assert_eq!(first.report.modules, second.report.modules);
}

// ═══════════════════════════════════════════════════════════════════════════
// Writing output
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_default_output_path_next_to_template() {
    let project = wallet_project();
    let config = project.config().build().unwrap();
    let target = config.output_path_for(&project.template_path());
    assert_eq!(target, project.path("template_rendered.py"));

    let output = project.render_with(config).unwrap();
    let written = output.render_to_file(&target, false).unwrap();
    assert_eq!(fs::read_to_string(&written).unwrap(), output.source);

    let err = output.render_to_file(&target, false).unwrap_err();
    assert!(matches!(err, RenderError::OutputExists { .. }));
    assert!(output.render_to_file(&target, true).is_ok());
}

// ═══════════════════════════════════════════════════════════════════════════
// Git provenance
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(feature = "git")]
mod git {
    use super::*;
    use pretty_assertions::assert_eq;
    use git2::{Repository, Signature};
    use std::path::Path;

    fn commit_all(repo: &Repository, message: &str) -> String {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = Signature::now("Test", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap()
            .to_string()
    }

    fn git_config(project: &ContractProject) -> contract_renderer::RenderConfig {
        project
            .config()
            .use_git(true)
            .git_repo_root(project.root())
            .use_full_filepath_in_headers(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_headers_carry_commit_of_each_module() {
        let project = wallet_project();
        let repo = Repository::init(project.root()).unwrap();
        let commit = commit_all(&repo, "initial");

        let source = project.render_with(git_config(&project)).unwrap().source;

        assert!(source.contains("#    lib/fees.py\n"), "{source}");
        assert!(source.contains("#    lib/limits.py\n"), "{source}");
        assert!(source.contains(&format!(" git:{commit}\n")), "{source}");
    }

    #[test]
    fn test_uncommitted_change_rejected() {
        let project = wallet_project();
        let repo = Repository::init(project.root()).unwrap();
        commit_all(&repo, "initial");
        fs::write(
            project.path("lib/limits.py"),
            "MAXIMUM = 5\n\n\ndef clamp(amount):\n    return min(amount, MAXIMUM)\n",
        )
        .unwrap();

        let err = project.render_with(git_config(&project)).unwrap_err();

        assert_eq!(err.category(), contract_renderer::ErrorCategory::Environment);
        let message = err.to_string();
        assert!(message.contains("Ensure that all changes are committed"), "{message}");
        assert!(message.contains(&Path::new("lib").join("limits.py").display().to_string()));
    }
}
