use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use super::*;
use crate::client::tests::StubApi;
use crate::context::ApiFactory;
use crate::i18n::Localizer;
use crate::ports::ImageApi;
use crate::settings::{SettingsStore, SettingsUpdate};

/// Replays canned answers; running out of answers quits.
struct ScriptedPrompter {
    answers: VecDeque<&'static str>,
}

impl ScriptedPrompter {
    fn new(answers: &[&'static str]) -> Self {
        Self { answers: answers.iter().copied().collect() }
    }

    fn answer(&mut self) -> Result<&'static str, PromptError> {
        self.answers.pop_front().ok_or(PromptError::Quit)
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, _message: &str, _initial: &str) -> Result<String, PromptError> {
        self.answer().map(str::to_string)
    }

    fn secret(&mut self, _message: &str) -> Result<String, PromptError> {
        self.answer().map(str::to_string)
    }

    fn select(&mut self, _title: &str, items: &[&str]) -> Result<usize, PromptError> {
        let index: usize = self.answer()?.parse().expect("select answers are indices");
        assert!(index < items.len(), "index {index} out of range");
        Ok(index)
    }
}

fn context(dir: &Path, api: StubApi) -> ServiceContext {
    let store = SettingsStore::new(dir.join("just-icon.json"));
    let factory: ApiFactory =
        Arc::new(move |_: &Settings| Box::new(api.clone()) as Box<dyn ImageApi>);
    ServiceContext::with_api(store, Localizer::default(), factory)
}

fn configured(ctx: &ServiceContext, output: &Path) {
    ctx.store
        .update(SettingsUpdate {
            api_key: Some("sk-test-1234".into()),
            output_path: Some(output.to_string_lossy().into_owned()),
            initialized: Some(true),
            ..Default::default()
        })
        .unwrap();
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn wizard_persists_answers_and_marks_initialized() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("icons");
    let output_answer: &'static str =
        Box::leak(output.to_string_lossy().into_owned().into_boxed_str());
    let mut ctx = context(dir.path(), StubApi::default());

    let script = ScriptedPrompter::new(&["1", "", "", "sk-test-key", output_answer]);
    let mut workflow = Workflow::new(&mut ctx, script);
    assert!(workflow.is_first_run().unwrap());

    // the script runs out at the prompt question
    assert_eq!(workflow.run().await.unwrap(), Outcome::Quit);
    assert!(!workflow.is_first_run().unwrap());
    drop(workflow);

    let settings = ctx.store.get().unwrap();
    assert!(settings.initialized);
    assert_eq!(settings.language, "zh");
    assert_eq!(settings.base_url, defaults::BASE_URL);
    assert_eq!(settings.api_key, "sk-test-key");
    assert_eq!(PathBuf::from(&settings.output_path), output);
    assert_eq!(ctx.localizer.language(), Language::Chinese);
}

#[tokio::test]
async fn quitting_the_wizard_leaves_settings_uninitialized() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = context(dir.path(), StubApi::default());

    let prompter = ScriptedPrompter::new(&["0", "https://proxy.example"]);
    let outcome = Workflow::new(&mut ctx, prompter).run().await;
    assert_eq!(outcome.unwrap(), Outcome::Quit);

    let settings = ctx.store.get().unwrap();
    assert!(!settings.initialized);
    assert_eq!(settings.base_url, "https://proxy.example");
    assert!(settings.api_key.is_empty());
}

#[tokio::test]
async fn missing_api_key_reports_not_configured() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = context(dir.path(), StubApi::default());
    ctx.store.update(SettingsUpdate { initialized: Some(true), ..Default::default() }).unwrap();

    let outcome = Workflow::new(&mut ctx, ScriptedPrompter::new(&[])).run().await.unwrap();
    assert_eq!(outcome, Outcome::NotConfigured);
}

#[tokio::test]
async fn saves_every_generated_image() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("icons");
    let api = StubApi::inline(&["aGVsbG8=", "d29ybGQ="]);
    let requests = Arc::clone(&api.requests);
    let mut ctx = context(dir.path(), api);
    configured(&ctx, &output);

    let script = ScriptedPrompter::new(&["A blue gear icon", "2", "1", "1"]);
    let outcome = Workflow::new(&mut ctx, script).run().await.unwrap();
    assert_eq!(outcome, Outcome::Finished);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].n, 2);
    assert_eq!(requests[0].quality, QUALITY_HIGH);
    assert!(requests[0].prompt.contains("A blue gear icon"));

    let mut saved = files_in(&output);
    saved.sort();
    assert_eq!(saved.len(), 2);
    assert_ne!(saved[0], saved[1]);
    let mut contents: Vec<Vec<u8>> = saved.iter().map(|p| std::fs::read(p).unwrap()).collect();
    contents.sort();
    assert_eq!(contents, vec![b"hello".to_vec(), b"world".to_vec()]);
}

#[tokio::test]
async fn empty_result_returns_to_the_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("icons");
    let api = StubApi::returning(Vec::new());
    let requests = Arc::clone(&api.requests);
    let mut ctx = context(dir.path(), api);
    configured(&ctx, &output);

    // after the failure the loop asks for a prompt again, and the script ends
    let script = ScriptedPrompter::new(&["A red heart", "1", "0"]);
    let outcome = Workflow::new(&mut ctx, script).run().await.unwrap();

    assert_eq!(outcome, Outcome::Quit);
    assert_eq!(requests.lock().unwrap().len(), 1);
    assert!(files_in(&output).is_empty());
}

#[tokio::test]
async fn invalid_prompts_are_asked_again() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("icons");
    let api = StubApi::inline(&["aGVsbG8="]);
    let requests = Arc::clone(&api.requests);
    let mut ctx = context(dir.path(), api);
    configured(&ctx, &output);

    let script = ScriptedPrompter::new(&[PROMPT_PLACEHOLDER, "   ", "A paper plane", "", "0", "1"]);
    let outcome = Workflow::new(&mut ctx, script).run().await.unwrap();
    assert_eq!(outcome, Outcome::Finished);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("A paper plane"));
    assert_eq!(requests[0].n, 1);
    assert_eq!(requests[0].quality, QUALITY_LOW);
}

#[tokio::test]
async fn too_many_images_fail_in_the_client() {
    let dir = tempfile::tempdir().unwrap();
    let api = StubApi::inline(&["aGVsbG8="]);
    let requests = Arc::clone(&api.requests);
    let mut ctx = context(dir.path(), api);
    configured(&ctx, &dir.path().join("icons"));

    let script = ScriptedPrompter::new(&["A lighthouse", "11", "0"]);
    let outcome = Workflow::new(&mut ctx, script).run().await.unwrap();

    assert_eq!(outcome, Outcome::Quit);
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn command_line_language_applies_to_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = context(dir.path(), StubApi::default());
    configured(&ctx, &dir.path().join("icons"));

    let outcome = Workflow::new(&mut ctx, ScriptedPrompter::new(&[]))
        .with_language(Some(Language::Chinese))
        .run()
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Quit);
    assert_eq!(ctx.localizer.language(), Language::Chinese);
    assert_eq!(ctx.store.get().unwrap().language, "");
}

#[tokio::test]
async fn ending_input_at_the_continue_menu_finishes() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("icons");
    let mut ctx = context(dir.path(), StubApi::inline(&["aGVsbG8="]));
    configured(&ctx, &output);

    let script = ScriptedPrompter::new(&["A blue gear icon", "1", "0"]);
    let outcome = Workflow::new(&mut ctx, script).run().await.unwrap();

    assert_eq!(outcome, Outcome::Finished);
    assert_eq!(files_in(&output).len(), 1);
}

fn batch_options(num_images: u32) -> GenerationOptions {
    GenerationOptions {
        prompt: "A compass rose".into(),
        num_images,
        ..GenerationOptions::default()
    }
}

#[tokio::test]
async fn batch_summary_counts_saved_images() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("icons");
    let mut ctx = context(dir.path(), StubApi::inline(&["aGVsbG8=", "d29ybGQ="]));
    configured(&ctx, &output);
    let settings = ctx.store.get().unwrap();

    let workflow = Workflow::new(&mut ctx, ScriptedPrompter::new(&[]));
    let summary = workflow.generate_batch(&settings, batch_options(2), &output).await.unwrap();

    assert_eq!(summary.saved.len(), 2);
    assert_eq!(summary.output_dir, output);
    assert_ne!(summary.saved[0], summary.saved[1]);
    assert!(summary.saved.iter().all(|p| p.starts_with(&output) && p.exists()));
}

#[tokio::test]
async fn undecodable_image_is_skipped_and_the_rest_saved() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("icons");
    let api = StubApi::inline(&["aGVsbG8=", "not base64!!", "d29ybGQ="]);
    let mut ctx = context(dir.path(), api);
    configured(&ctx, &output);
    let settings = ctx.store.get().unwrap();

    let workflow = Workflow::new(&mut ctx, ScriptedPrompter::new(&[]));
    let summary = workflow.generate_batch(&settings, batch_options(3), &output).await.unwrap();

    assert_eq!(summary.saved.len(), 2);
    assert_eq!(files_in(&output).len(), 2);
}

#[tokio::test]
async fn batch_with_no_saved_images_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("icons");
    let mut ctx = context(dir.path(), StubApi::inline(&["!!!", "@@@"]));
    configured(&ctx, &output);
    let settings = ctx.store.get().unwrap();

    let workflow = Workflow::new(&mut ctx, ScriptedPrompter::new(&[]));
    let err = workflow.generate_batch(&settings, batch_options(2), &output).await.unwrap_err();

    assert!(matches!(err, BatchError::NothingSaved));
    assert!(files_in(&output).is_empty());
}

#[test]
fn save_batch_retries_once_then_skips() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("icons");
    std::fs::create_dir_all(&output).unwrap();
    let mut ctx = context(dir.path(), StubApi::default());
    let workflow = Workflow::new(&mut ctx, ScriptedPrompter::new(&[]));

    let images = ["aGVsbG8=".to_string(), "%%%".to_string(), "d29ybGQ=".to_string()];
    let saved = workflow.save_batch(&images, &output, "png");

    assert_eq!(saved.len(), 2);
    let contents: Vec<Vec<u8>> = saved.iter().map(|p| std::fs::read(p).unwrap()).collect();
    assert_eq!(contents, vec![b"hello".to_vec(), b"world".to_vec()]);
}

#[test]
fn quantity_parsing() {
    assert_eq!(parse_quantity("3"), 3);
    assert_eq!(parse_quantity(" 11 "), 11);
    assert_eq!(parse_quantity("0"), 1);
    assert_eq!(parse_quantity("-2"), 1);
    assert_eq!(parse_quantity("many"), 1);
    assert_eq!(parse_quantity(""), 1);
}

#[test]
fn quality_menu_mapping() {
    assert_eq!(quality_for_choice(0), QUALITY_AUTO);
    assert_eq!(quality_for_choice(1), QUALITY_HIGH);
    assert_eq!(quality_for_choice(2), QUALITY_MEDIUM);
    assert_eq!(quality_for_choice(3), QUALITY_LOW);
    assert_eq!(quality_for_choice(9), QUALITY_AUTO);
}
