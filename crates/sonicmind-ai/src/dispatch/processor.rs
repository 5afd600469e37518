use std::sync::Arc;

use sonicmind_core::interfaces::{IntentClassifier, SpeechSynthesizer, VideoSearch, WebSearch};
use sonicmind_core::{ActionResult, AssistantResult, Command, Intent, LabelScore};

use super::registry::{ActionContext, ActionRegistry};

/// Turns one command into one result: classify, apply keyword overrides,
/// dispatch to the registered handler.
///
/// Holds no per-command state, so a single instance serves every command.
pub struct CommandProcessor {
    classifier: Arc<dyn IntentClassifier>,
    video: Arc<dyn VideoSearch>,
    web: Arc<dyn WebSearch>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    registry: ActionRegistry,
    min_confidence: f32,
}

impl CommandProcessor {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        video: Arc<dyn VideoSearch>,
        web: Arc<dyn WebSearch>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            classifier,
            video,
            web,
            synthesizer,
            registry: ActionRegistry::new(),
            min_confidence: 0.0,
        }
    }

    /// Top scores below `threshold` are treated as `unknown`.
    pub fn with_min_confidence(mut self, threshold: f32) -> Self {
        self.min_confidence = threshold;
        self
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Raw ranked classifier output for `text` over every intent label.
    pub async fn rank_labels(&self, text: &str) -> AssistantResult<Vec<LabelScore>> {
        self.classifier.classify(text, &Intent::labels()).await
    }

    /// The classifier's verdict alone. Blank text, classifier failures and
    /// low-confidence results all come back as `Unknown`.
    pub async fn classify(&self, text: &str) -> Intent {
        if text.trim().is_empty() {
            return Intent::Unknown;
        }

        match self.rank_labels(text).await {
            Ok(ranked) => self.top_intent(&ranked),
            Err(e) => {
                tracing::warn!("Classifier unavailable, falling back to keywords: {e}");
                Intent::Unknown
            }
        }
    }

    /// Intent for an already-ranked classifier output, honouring the
    /// confidence threshold. An empty ranking is `Unknown`.
    pub fn top_intent(&self, ranked: &[LabelScore]) -> Intent {
        match ranked.first() {
            Some(top) if top.score >= self.min_confidence => Intent::from_label(&top.label),
            Some(top) => {
                tracing::info!(
                    "Low confidence ({:.2}) for '{}', treating as unknown",
                    top.score,
                    top.label
                );
                Intent::Unknown
            }
            None => Intent::Unknown,
        }
    }

    /// Classifier verdict after the keyword tie-break.
    pub async fn resolve_intent(&self, text: &str) -> Intent {
        let classified = self.classify(text).await;
        self.registry.apply_override(classified, text)
    }

    /// Process one command to completion.
    ///
    /// `Err` means the video or web action itself failed; every other outcome,
    /// including missing payloads and unrecognized commands, is an `Ok` result.
    pub async fn process(&self, command: &Command) -> AssistantResult<ActionResult> {
        let intent = self.resolve_intent(command.text()).await;
        self.dispatch(intent, command).await
    }

    /// Run the handler registered for an already-resolved intent.
    pub async fn dispatch(&self, intent: Intent, command: &Command) -> AssistantResult<ActionResult> {
        tracing::info!(
            "Intent: {intent} (source={:?}, captured_at={}, text={:?})",
            command.source(),
            command.captured_at().to_rfc3339(),
            command.text()
        );

        let handler = self.registry.resolve(intent);
        let ctx = ActionContext {
            video: self.video.as_ref(),
            web: self.web.as_ref(),
            synthesizer: self.synthesizer.as_ref(),
        };
        let result = handler.execute(command.text(), &ctx).await?;
        tracing::debug!("Result: {:?} {}", result.status, result.message);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use sonicmind_core::{ActionStatus, AssistantError};

    use super::*;
    use crate::dispatch::jokes::JOKES;
    use crate::dispatch::registry::{GREETING, MISSING_QUERY, MISSING_SONG, NOT_UNDERSTOOD};

    /// Returns a fixed label, or fails when `label` is `None`.
    struct FixedClassifier {
        label: Option<&'static str>,
        score: f32,
        calls: Mutex<Vec<String>>,
    }

    impl FixedClassifier {
        fn new(label: &'static str) -> Self {
            Self {
                label: Some(label),
                score: 0.9,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                label: None,
                score: 0.0,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IntentClassifier for FixedClassifier {
        async fn classify(&self, text: &str, labels: &[&str]) -> AssistantResult<Vec<LabelScore>> {
            self.calls.lock().unwrap().push(text.to_string());
            assert_eq!(labels, Intent::labels().as_slice());
            match self.label {
                Some(label) => Ok(vec![
                    LabelScore::new(label, self.score),
                    LabelScore::new("unknown", 1.0 - self.score),
                ]),
                None => Err(AssistantError::Classifier("offline".into())),
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        played: Mutex<Vec<String>>,
        searched: Mutex<Vec<String>>,
        spoken: Mutex<Vec<String>>,
        fail_actions: bool,
        fail_speech: bool,
    }

    #[async_trait]
    impl VideoSearch for Recorder {
        async fn play(&self, query: &str) -> AssistantResult<()> {
            if self.fail_actions {
                return Err(AssistantError::external_action("Video playback", "no browser"));
            }
            self.played.lock().unwrap().push(query.to_string());
            Ok(())
        }
    }

    #[async_trait]
    impl WebSearch for Recorder {
        async fn search(&self, query: &str) -> AssistantResult<()> {
            if self.fail_actions {
                return Err(AssistantError::external_action("Web search", "no browser"));
            }
            self.searched.lock().unwrap().push(query.to_string());
            Ok(())
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for Recorder {
        async fn speak(&self, text: &str) -> AssistantResult<()> {
            if self.fail_speech {
                return Err(AssistantError::Synthesis("audio device busy".into()));
            }
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn processor(classifier: FixedClassifier, recorder: Arc<Recorder>) -> CommandProcessor {
        CommandProcessor::new(
            Arc::new(classifier),
            recorder.clone(),
            recorder.clone(),
            recorder,
        )
    }

    #[tokio::test]
    async fn play_with_song_plays_and_speaks() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("play_music"), rec.clone());

        let result = proc.process(&Command::typed("play despacito")).await.unwrap();

        assert_eq!(result.status, ActionStatus::Success);
        assert_eq!(result.intent, Intent::PlayMusic);
        assert_eq!(result.message, "Playing despacito on YouTube...");
        assert_eq!(result.spoken.as_deref(), Some("Playing despacito"));
        assert_eq!(*rec.played.lock().unwrap(), vec!["despacito"]);
        assert_eq!(*rec.spoken.lock().unwrap(), vec!["Playing despacito"]);
    }

    #[tokio::test]
    async fn play_keyword_overrides_classifier() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("greeting"), rec.clone());

        let result = proc.process(&Command::typed("play hello")).await.unwrap();

        assert_eq!(result.intent, Intent::PlayMusic);
        assert_eq!(*rec.played.lock().unwrap(), vec!["hello"]);
    }

    #[tokio::test]
    async fn play_without_song_warns_and_does_nothing() {
        for text in ["play", "  play ", "PLAY"] {
            let rec = Arc::new(Recorder::default());
            let proc = processor(FixedClassifier::new("play_music"), rec.clone());

            let result = proc.process(&Command::typed(text)).await.unwrap();

            assert_eq!(result.status, ActionStatus::Warning);
            assert_eq!(result.message, MISSING_SONG);
            assert!(result.spoken.is_none());
            assert!(rec.played.lock().unwrap().is_empty());
            assert!(rec.spoken.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn classifier_play_music_without_keyword_uses_whole_text() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("play_music"), rec.clone());

        proc.process(&Command::typed("Despacito please")).await.unwrap();

        assert_eq!(*rec.played.lock().unwrap(), vec!["Despacito please"]);
    }

    #[tokio::test]
    async fn joke_is_one_of_the_five() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("tell_joke"), rec.clone());

        for _ in 0..10 {
            let result = proc.process(&Command::typed("tell me a joke")).await.unwrap();
            assert_eq!(result.status, ActionStatus::Success);
            assert_eq!(result.intent, Intent::TellJoke);
            assert!(JOKES.contains(&result.message.as_str()));
            assert_eq!(result.spoken.as_deref(), Some(result.message.as_str()));
        }
        assert_eq!(rec.spoken.lock().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn search_extracts_query() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("search_web"), rec.clone());

        let result = proc.process(&Command::typed("search python tutorials")).await.unwrap();

        assert_eq!(result.intent, Intent::SearchWeb);
        assert_eq!(result.status, ActionStatus::Success);
        assert_eq!(result.message, "Searching Google for python tutorials...");
        assert_eq!(*rec.searched.lock().unwrap(), vec!["python tutorials"]);
        assert_eq!(*rec.spoken.lock().unwrap(), vec!["Searching for python tutorials"]);
    }

    #[tokio::test]
    async fn search_keyword_overrides_unknown() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("unknown"), rec.clone());

        let result = proc.process(&Command::typed("search rust borrow checker")).await.unwrap();

        assert_eq!(result.intent, Intent::SearchWeb);
        assert_eq!(*rec.searched.lock().unwrap(), vec!["rust borrow checker"]);
    }

    #[tokio::test]
    async fn search_without_query_warns() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("search_web"), rec.clone());

        let result = proc.process(&Command::typed("search")).await.unwrap();

        assert_eq!(result.status, ActionStatus::Warning);
        assert_eq!(result.message, MISSING_QUERY);
        assert!(rec.searched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn greeting_speaks_canned_reply() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("greeting"), rec.clone());

        let result = proc.process(&Command::typed("hello there")).await.unwrap();

        assert_eq!(result.status, ActionStatus::Success);
        assert_eq!(result.message, GREETING);
        assert_eq!(*rec.spoken.lock().unwrap(), vec![GREETING]);
    }

    #[tokio::test]
    async fn unknown_warns_not_understood() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("unknown"), rec.clone());

        let result = proc.process(&Command::typed("xyzzy")).await.unwrap();

        assert_eq!(result.status, ActionStatus::Warning);
        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.message, NOT_UNDERSTOOD);
        assert!(rec.played.lock().unwrap().is_empty());
        assert!(rec.searched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_command_skips_classifier() {
        let rec = Arc::new(Recorder::default());
        let classifier = Arc::new(FixedClassifier::new("greeting"));
        let proc = CommandProcessor::new(classifier.clone(), rec.clone(), rec.clone(), rec.clone());

        let result = proc.process(&Command::typed("   ")).await.unwrap();

        assert_eq!(result.status, ActionStatus::Warning);
        assert_eq!(result.message, NOT_UNDERSTOOD);
        assert!(classifier.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unlabelled_classifier_output_is_unknown() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("order_pizza"), rec);

        let result = proc.process(&Command::typed("pepperoni large")).await.unwrap();

        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.status, ActionStatus::Warning);
    }

    #[tokio::test]
    async fn classifier_failure_falls_back_to_keywords() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::failing(), rec.clone());

        let result = proc.process(&Command::typed("play jazz")).await.unwrap();
        assert_eq!(result.intent, Intent::PlayMusic);
        assert_eq!(*rec.played.lock().unwrap(), vec!["jazz"]);

        let result = proc.process(&Command::typed("tell me a joke")).await.unwrap();
        assert_eq!(result.intent, Intent::Unknown);
    }

    #[tokio::test]
    async fn low_confidence_is_unknown() {
        let rec = Arc::new(Recorder::default());
        let mut classifier = FixedClassifier::new("greeting");
        classifier.score = 0.3;
        let proc = processor(classifier, rec).with_min_confidence(0.5);

        assert_eq!(proc.resolve_intent("howdy").await, Intent::Unknown);
    }

    #[tokio::test]
    async fn action_failure_propagates() {
        let rec = Arc::new(Recorder {
            fail_actions: true,
            ..Recorder::default()
        });
        let proc = processor(FixedClassifier::new("play_music"), rec);

        let err = proc.process(&Command::typed("play despacito")).await.unwrap_err();

        assert!(matches!(err, AssistantError::ExternalAction { .. }));
    }

    #[tokio::test]
    async fn speech_failure_is_swallowed() {
        let rec = Arc::new(Recorder {
            fail_speech: true,
            ..Recorder::default()
        });
        let proc = processor(FixedClassifier::new("greeting"), rec);

        let result = proc.process(&Command::typed("hi")).await.unwrap();

        assert_eq!(result.status, ActionStatus::Success);
    }

    #[tokio::test]
    async fn voice_command_is_processed_lowercased() {
        let rec = Arc::new(Recorder::default());
        let proc = processor(FixedClassifier::new("search_web"), rec.clone());

        proc.process(&Command::voice("Search Rust Book")).await.unwrap();

        assert_eq!(*rec.searched.lock().unwrap(), vec!["rust book"]);
    }

    #[test]
    fn top_intent_reads_an_existing_ranking() {
        let proc = processor(FixedClassifier::new("greeting"), Arc::new(Recorder::default()))
            .with_min_confidence(0.5);
        let ranked = vec![
            LabelScore::new("tell_joke", 0.8),
            LabelScore::new("greeting", 0.2),
        ];

        assert_eq!(proc.top_intent(&ranked), Intent::TellJoke);
        assert_eq!(proc.top_intent(&ranked[1..]), Intent::Unknown);
        assert_eq!(proc.top_intent(&[]), Intent::Unknown);
        assert_eq!(
            proc.registry().apply_override(proc.top_intent(&ranked), "play a joke song"),
            Intent::PlayMusic
        );
    }
}
