//! Workflow execution orchestration.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{KilnConfig, PhaseConfig, StepConfig};
use crate::error::Result;
use crate::shell::OperatorInput;
use crate::steps::{execute_step, ExecutionOptions, ResolvedStep, StepResult};
use crate::template::{TemplateResolver, VariableStore};
use crate::ui::{RunSummary, UserInterface};

use super::prompts::collect_variables;

/// Printed after the last phase when `afterPhases.message` is absent.
pub const DEFAULT_COMPLETION_MESSAGE: &str = "{{project_name}} is ready!";

/// Orchestrates the execution of a workflow.
///
/// Running is split in two: [`collect`](Self::collect) builds the variable
/// store, then [`run`](Self::run) executes the phases against a borrowed,
/// read-only store.
pub struct WorkflowRunner<'a> {
    config: &'a KilnConfig,
}

/// Result of running a workflow.
#[derive(Debug)]
pub struct WorkflowResult {
    /// Results from each executed step, in order.
    pub steps: Vec<StepResult>,
    /// Titles of steps that did not run because of a `when` condition.
    /// Steps of a skipped phase are never evaluated and keep their raw titles.
    pub skipped: Vec<String>,
    /// Total duration.
    pub duration: Duration,
    /// The resolved completion message.
    pub completion_message: String,
}

/// Options for running a workflow.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory relative paths and commands resolve against.
    pub root: PathBuf,
    /// Describe steps instead of running them.
    pub dry_run: bool,
    /// Operator input for interactive commands. `None` reads the process's
    /// stdin while each interactive command runs.
    pub operator: Option<OperatorInput>,
}

impl RunOptions {
    /// Options for a real run rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
            operator: None,
        }
    }
}

impl<'a> WorkflowRunner<'a> {
    /// Create a new workflow runner.
    pub fn new(config: &'a KilnConfig) -> Self {
        Self { config }
    }

    /// Seed the variable store and ask every configured prompt.
    pub fn collect(&self, ui: &mut dyn UserInterface) -> Result<VariableStore> {
        collect_variables(self.config, ui)
    }

    /// Run every phase in order.
    ///
    /// The first failing step aborts the run with
    /// [`KilnError::StepFailed`](crate::error::KilnError::StepFailed); later
    /// steps and phases are not attempted.
    pub fn run(
        &self,
        store: &VariableStore,
        ui: &mut dyn UserInterface,
        options: &RunOptions,
    ) -> Result<WorkflowResult> {
        let start = Instant::now();
        let resolver = TemplateResolver::new(store);

        if let Some(name) = &self.config.meta.name {
            ui.show_run_header(
                &resolver.resolve(name),
                self.config.meta.version.as_deref(),
                self.config.step_count(),
            );
        }

        let mut steps = Vec::new();
        let mut skipped = Vec::new();

        for phase in &self.config.workflow.phases {
            let phase_title = resolver.resolve(&phase.title);
            if !condition_met(phase.when.as_deref(), &resolver) {
                tracing::debug!("Phase '{}' condition not met", phase_title);
                ui.skipped(&format!("Skipping phase: {} (condition not met)", phase_title));
                skipped.extend(phase.steps.iter().map(|s| s.title.clone()));
                continue;
            }

            self.run_phase(phase, &phase_title, &resolver, ui, options, &mut steps, &mut skipped)?;
        }

        let duration = start.elapsed();
        ui.show_run_summary(&RunSummary {
            steps_run: steps.len(),
            steps_skipped: skipped.len(),
            total_duration: duration,
        });

        let completion_message = resolver.resolve(
            self.config
                .completion_message()
                .unwrap_or(DEFAULT_COMPLETION_MESSAGE),
        );
        ui.success(&completion_message);

        Ok(WorkflowResult {
            steps,
            skipped,
            duration,
            completion_message,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn run_phase(
        &self,
        phase: &PhaseConfig,
        phase_title: &str,
        resolver: &TemplateResolver<'_>,
        ui: &mut dyn UserInterface,
        options: &RunOptions,
        steps: &mut Vec<StepResult>,
        skipped: &mut Vec<String>,
    ) -> Result<()> {
        let description = phase.description.as_deref().map(|d| resolver.resolve(d));
        ui.show_phase(phase_title, description.as_deref());

        for step in &phase.steps {
            let title = resolver.resolve(&step.title);
            if !condition_met(step.when.as_deref(), resolver) {
                tracing::debug!("Step '{}' condition not met", title);
                ui.skipped(&format!("Skipping step: {} (condition not met)", title));
                skipped.push(title);
                continue;
            }

            let result = run_step(step, resolver, ui, options).map_err(|e| e.in_step(&title))?;
            steps.push(result);
        }
        Ok(())
    }
}

fn condition_met(when: Option<&str>, resolver: &TemplateResolver<'_>) -> bool {
    when.map_or(true, |w| resolver.evaluate_when(w))
}

fn run_step(
    step: &StepConfig,
    resolver: &TemplateResolver<'_>,
    ui: &mut dyn UserInterface,
    options: &RunOptions,
) -> Result<StepResult> {
    let resolved = ResolvedStep::resolve(step, resolver, &options.root)?;
    ui.show_step(&resolved.title, resolved.description.as_deref());

    let operator = options.operator.clone().unwrap_or_else(OperatorInput::stdin);

    let result = execute_step(
        &resolved,
        &operator,
        ui,
        &ExecutionOptions {
            dry_run: options.dry_run,
        },
    )?;

    match &result.description {
        Some(description) => ui.message(&format!("  {}", description)),
        None => ui.success(&resolved.title),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, DocumentFormat};
    use crate::error::KilnError;
    use crate::ui::MockUI;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(yaml: &str) -> KilnConfig {
        parse_config(yaml, DocumentFormat::Yaml, Path::new("kiln.yml")).unwrap()
    }

    fn run(yaml: &str, root: &Path, ui: &mut MockUI) -> Result<WorkflowResult> {
        let config = config(yaml);
        let runner = WorkflowRunner::new(&config);
        let store = runner.collect(ui)?;
        let mut options = RunOptions::new(root);
        options.operator = Some(OperatorInput::none());
        runner.run(&store, ui, &options)
    }

    #[test]
    fn creates_project_directory() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = run(
            r#"
config:
  variables:
    project_name: demo
workflow:
  phases:
    - title: Scaffold
      steps:
        - title: Source folder
          type: directory
          paths: ["{{project_name}}/src"]
"#,
            temp.path(),
            &mut ui,
        )
        .unwrap();

        assert!(temp.path().join("demo/src").is_dir());
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.completion_message, "demo is ready!");
        assert_eq!(ui.phases(), ["Scaffold".to_string()]);
        assert!(ui.has_success("demo is ready!"));
    }

    #[test]
    fn step_with_false_condition_is_skipped() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = run(
            r#"
workflow:
  phases:
    - title: Scaffold
      steps:
        - title: TypeScript config
          when: "{{use_ts}}"
          type: file
          action: create
          path: tsconfig.json
          content: "{}"
        - title: JavaScript config
          when: "!use_ts"
          type: file
          action: create
          path: jsconfig.json
"#,
            temp.path(),
            &mut ui,
        )
        .unwrap();

        assert!(!temp.path().join("tsconfig.json").exists());
        assert!(temp.path().join("jsconfig.json").exists());
        assert_eq!(result.skipped, vec!["TypeScript config".to_string()]);
        assert!(ui.has_skip("TypeScript config"));
    }

    #[test]
    fn phase_with_false_condition_skips_all_steps() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = run(
            r#"
config:
  variables:
    framework: vue
workflow:
  phases:
    - title: React setup
      when: "framework == 'react'"
      steps:
        - title: Unsupported but never reached
          type: teleport
        - title: Components
          type: directory
          paths: [src/components]
"#,
            temp.path(),
            &mut ui,
        )
        .unwrap();

        assert!(!temp.path().join("src").exists());
        assert_eq!(result.skipped.len(), 2);
        assert!(ui.phases().is_empty());
        assert!(ui.has_skip("React setup"));
    }

    #[test]
    fn skipped_phase_keeps_raw_step_titles() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = run(
            r#"
workflow:
  phases:
    - title: Extras
      when: with_extras
      steps:
        - title: "Configure {{extra_name}}"
          type: directory
          paths: ["{{extra_name}}"]
"#,
            temp.path(),
            &mut ui,
        )
        .unwrap();

        assert_eq!(result.skipped, vec!["Configure {{extra_name}}".to_string()]);
        assert!(ui.steps().is_empty());
    }

    #[test]
    fn null_variable_counts_as_unset() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = run(
            r#"
config:
  variables:
    license: ~
workflow:
  phases:
    - title: Legal
      steps:
        - title: License file
          when: license
          type: file
          action: create
          path: LICENSE
        - title: Notice
          when: "!license"
          type: file
          action: create
          path: NOTICE
          content: "license: {{license}}"
"#,
            temp.path(),
            &mut ui,
        )
        .unwrap();

        assert_eq!(result.skipped, vec!["License file".to_string()]);
        assert_eq!(
            fs::read_to_string(temp.path().join("NOTICE")).unwrap(),
            "license: {{license}}"
        );
    }

    #[test]
    fn first_failure_aborts_remaining_steps() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let err = run(
            r#"
workflow:
  phases:
    - title: One
      steps:
        - title: Before
          type: directory
          paths: [before]
        - title: Broken move
          type: file
          action: move
          path:
            from: missing.txt
            to: dest/moved.txt
        - title: After
          type: directory
          paths: [after]
    - title: Two
      steps:
        - title: Later phase
          type: directory
          paths: [later]
"#,
            temp.path(),
            &mut ui,
        )
        .unwrap_err();

        match &err {
            KilnError::StepFailed { step, source } => {
                assert_eq!(step, "Broken move");
                assert!(matches!(**source, KilnError::MoveSourceMissing { .. }));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(temp.path().join("before").is_dir());
        assert!(!temp.path().join("dest").exists());
        assert!(!temp.path().join("after").exists());
        assert!(!temp.path().join("later").exists());
        assert!(ui.summaries().is_empty());
    }

    #[test]
    fn unsupported_step_type_fails_when_reached() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let err = run(
            r#"
workflow:
  phases:
    - title: One
      steps:
        - title: Ran first
          type: directory
          paths: [first]
        - title: Odd
          type: teleport
"#,
            temp.path(),
            &mut ui,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Unsupported step type: teleport"));
        assert!(temp.path().join("first").is_dir());
    }

    #[test]
    fn completion_message_is_resolved() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = run(
            r#"
config:
  variables:
    project_name: demo
afterPhases:
  message: "cd {{project_name}}{{#if use_ts}} && tsc{{/if}}"
"#,
            temp.path(),
            &mut ui,
        )
        .unwrap();

        assert_eq!(result.completion_message, "cd demo");
        assert_eq!(ui.summaries().len(), 1);
    }

    #[test]
    fn dry_run_describes_without_side_effects() {
        let temp = TempDir::new().unwrap();
        let config = config(
            r#"
workflow:
  phases:
    - title: One
      steps:
        - title: Folder
          type: directory
          paths: [made]
"#,
        );
        let mut ui = MockUI::new();
        let runner = WorkflowRunner::new(&config);
        let store = runner.collect(&mut ui).unwrap();
        let options = RunOptions {
            dry_run: true,
            operator: Some(OperatorInput::none()),
            ..RunOptions::new(temp.path())
        };

        let result = runner.run(&store, &mut ui, &options).unwrap();

        assert!(!temp.path().join("made").exists());
        assert!(ui.has_message("Would create directory"));
        assert!(result.steps[0].description.is_some());
    }

    #[test]
    fn header_uses_meta_name() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        run("meta:\n  name: starter\n  version: '1.0'\n", temp.path(), &mut ui).unwrap();

        assert_eq!(ui.headers(), ["starter".to_string()]);
    }
}
