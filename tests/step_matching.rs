//! Integration tests for step naming and run-time step name reconciliation.

#[allow(dead_code)]
mod helpers;

use helpers::*;
use workflow_ast::model::StepModel;

#[test]
fn run_prefix_is_stripped() {
    let workflow = ci_workflow();
    let fmt = workflow.job("fmt").unwrap();
    let step = StepModel::match_name(fmt.steps(), "Run deno fmt --check").unwrap();
    assert_eq!(step.start_line(), 16);
    assert_eq!(step.value().run.as_deref(), Some("deno fmt --check"));
}

#[test]
fn action_steps_match_by_action() {
    let workflow = ci_workflow();
    let fmt = workflow.job("fmt").unwrap();
    for raw in [
        "Run actions/checkout@v4",
        "Pre Run actions/checkout@v4",
        "Post Run actions/checkout@v4",
    ] {
        let step = fmt.match_step(raw).unwrap();
        assert_eq!(step.start_line(), 12, "{raw}");
    }
    assert_eq!(fmt.match_step("Run denoland/setup-deno@v1").unwrap().start_line(), 13);
}

#[test]
fn named_steps_match_with_post_prefix() {
    let workflow = ci_workflow();
    let build = workflow.job("build").unwrap();
    assert_eq!(build.match_step("Checkout").unwrap().start_line(), 25);
    assert_eq!(build.match_step("Post Checkout").unwrap().start_line(), 25);
    assert_eq!(build.match_step("Build").unwrap().start_line(), 27);
}

#[test]
fn local_action_step_matches_by_path() {
    let workflow = ci_workflow();
    let build = workflow.job("build").unwrap();
    let step = build.match_step("Run ./.github/actions/setup-cache").unwrap();
    assert_eq!(step.start_line(), 29);
}

#[test]
fn pseudo_steps_never_match() {
    let workflow = ci_workflow();
    for job in workflow.jobs() {
        assert!(StepModel::match_name(job.steps(), "Set up job").is_none());
        assert!(StepModel::match_name(job.steps(), "Complete job").is_none());
    }

    // Even a step literally named like a pseudo-step.
    let yaml = "jobs:\n  a:\n    runs-on: x\n    steps:\n      - name: Set up job\n        run: echo\n";
    let named = helpers::workflow(yaml, "w.yml");
    assert!(named.jobs()[0].match_step("Set up job").is_none());
}

#[test]
fn unknown_step_is_absent() {
    let workflow = ci_workflow();
    assert!(workflow.job("fmt").unwrap().match_step("Run cargo clippy").is_none());
    assert!(workflow.job("release").unwrap().match_step("Run anything").is_none());
}

#[test]
fn composite_detection_and_uses_split() {
    let workflow = ci_workflow();
    let build = workflow.job("build").unwrap();

    let checkout = &build.steps()[0];
    assert!(!checkout.is_composite());
    let uses = checkout.uses().unwrap();
    assert_eq!(uses.action, "actions/checkout");
    assert_eq!(uses.git_ref.as_deref(), Some("v4"));

    let cache = &build.steps()[2];
    assert!(cache.is_composite());
    assert_eq!(cache.uses().unwrap().git_ref, None);
    assert_eq!(cache.composite_action_dir(), Some(".github/actions/setup-cache"));
    assert_eq!(
        cache.composite_action_paths(),
        vec![
            ".github/actions/setup-cache/action.yml".to_string(),
            ".github/actions/setup-cache/action.yaml".to_string(),
        ]
    );

    let root_action = &build.steps()[3];
    assert!(!root_action.is_composite());
    assert_eq!(root_action.composite_action_dir(), None);
}

#[test]
fn name_and_showable_priorities() {
    let yaml = "\
jobs:
  a:
    runs-on: x
    steps:
      - name: Named
        uses: actions/checkout@v4
      - uses: actions/setup-node@v4
        run: ignored
      - run: make all
      - with:
          x: 1
";
    let workflow = workflow(yaml, "w.yml");
    let steps = workflow.jobs()[0].steps();

    assert_eq!(steps[0].name(), "Named");
    assert_eq!(steps[0].showable(), "Named");

    // `run` outranks `uses` for the name, `uses` outranks `run` for display.
    assert_eq!(steps[1].name(), "ignored");
    assert_eq!(steps[1].showable(), "actions/setup-node@v4");

    assert_eq!(steps[2].name(), "make all");
    assert_eq!(steps[2].showable(), "make all");

    assert_eq!(steps[3].name(), "");
    assert_eq!(steps[3].showable(), "Error: Not showable step");
}

#[test]
fn first_match_wins() {
    let yaml = "\
jobs:
  a:
    runs-on: x
    steps:
      - uses: actions/cache@v4
      - uses: actions/cache@v3
";
    let workflow = workflow(yaml, "w.yml");
    let step = workflow.jobs()[0].match_step("Post Run actions/cache@v3").unwrap();
    assert_eq!(step.start_line(), 5);
}
