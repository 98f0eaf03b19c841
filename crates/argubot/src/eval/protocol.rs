//! The LLM-as-judge evaluation protocol and evaluation campaigns.
//!
//! A dialogue is judged twice: once by the human participant (simulated by an
//! [`EvaluationAgent`] playing their [`Character`]) and once by an external
//! observer. Each judge first answers an open-ended warm-up question about the
//! dialogue, which is kept as a comment, and then gives integer ratings. Every
//! rating question continues the warm-up exchange on its own, so a judge never
//! sees their earlier ratings.

use super::config::{EvalConfig, judge};
use super::{Comment, Eval, EvalError};
use crate::agent::{Agent, AgentError, CharacterAgent, EvaluationAgent, RatingOutcome};
use crate::character::Character;
use crate::dialogue::Dialogue;
use crate::llm::{TextGenerator, UsageTracker};
use crate::prompt;
use crate::prompt::conjunction;
use crate::simulate::Simulator;
use std::collections::BTreeMap;
use std::sync::Arc;

const PARTICIPANT_WARMUP: &str = "\
Hello {{ name }}!  Here is a conversation that you had with {{ others }}.

{{ script }}

What did {{ other }} disagree with you about? How did the conversation go, in your opinion? \
Where could {{ other }} have done better?";

const OBSERVER_WARMUP: &str = "\
Here is a conversation that you observed among {{ speakers }}.

{{ script }}

{{ other }} was trying to make this a constructive conversation, and to help {{ others }} \
appreciate other points of view. How well did {{ other }} stay on topic?";

/// What every evaluation needs: settings and the generator behind the judges.
#[derive(Clone)]
pub struct EvalContext {
    pub config: EvalConfig,
    pub generator: Arc<dyn TextGenerator>,
}

impl EvalContext {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config: EvalConfig::default(),
            generator,
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }
}

impl std::fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalContext")
            .field("config", &self.config)
            .field("model", &self.generator.model_name())
            .finish()
    }
}

/// Asks `participant` what they now think of `other` after `dialogue`.
///
/// Both must have spoken in the dialogue. The warm-up answer is kept under
/// `overview`; ratings go under `engaged`, `informed`, `intelligent` and
/// `moral`. Unparseable ratings are left out.
pub async fn eval_by_participant(
    participant: &Character,
    other: &str,
    dialogue: &Dialogue,
    ctx: &EvalContext,
) -> Result<Eval, EvalError> {
    let name = participant.name.as_str();
    if !(dialogue.has_speaker(name) && dialogue.has_speaker(other)) {
        return Err(EvalError::Precondition(format!(
            "{name} and {other} did not both participate in dialogue"
        )));
    }

    let agent = EvaluationAgent::new(participant.clone(), ctx.generator.clone())?;
    let team = ctx.config.research_team.as_str();
    let others: Vec<&str> = dialogue
        .speakers()
        .into_iter()
        .filter(|speaker| *speaker != name)
        .collect();

    let warmup = prompt!(
        PARTICIPANT_WARMUP,
        name = name,
        others = conjunction(&others, "yourself"),
        script = dialogue.script(),
        other = other
    )
    .map_err(AgentError::from)?;
    let d = agent.ask(&Dialogue::new(), team, &warmup).await?;
    let overview = d.last().map(|turn| turn.content.clone()).unwrap_or_default();

    let mut questions = vec![(
        "engaged".to_string(),
        format!("Did {other} listen carefully to you and engage with what you were saying?"),
    )];
    for quality in ["informed", "intelligent", "moral"] {
        questions.push((
            quality.to_string(),
            format!("Do you think that people who think like {other} about that topic are {quality}?"),
        ));
    }

    let (low, high) = (
        *ctx.config.participant_scale.start(),
        *ctx.config.participant_scale.end(),
    );
    let mut scores = BTreeMap::new();
    for (criterion, question) in questions {
        if let RatingOutcome::Score(score) = agent.rating(&d, team, &question, low, high).await? {
            scores.insert(criterion, score);
        }
    }

    Ok(Eval::from_scores(scores).with_comment("overview", Comment::new(name, overview)))
}

/// Asks an outside `observer` how well `other` did in `dialogue`.
///
/// The warm-up answer is kept under `mindopening` and the rating under
/// `skilled`. `question` replaces the default rating question.
pub async fn eval_by_observer(
    observer: &Character,
    other: &str,
    dialogue: &Dialogue,
    question: Option<&str>,
    ctx: &EvalContext,
) -> Result<Eval, EvalError> {
    let agent = EvaluationAgent::new(observer.clone(), ctx.generator.clone())?;
    let team = ctx.config.research_team.as_str();
    let speakers = dialogue.speakers();
    let others: Vec<&str> = speakers
        .iter()
        .copied()
        .filter(|speaker| *speaker != other)
        .collect();

    let warmup = prompt!(
        OBSERVER_WARMUP,
        speakers = conjunction(&speakers, ""),
        script = dialogue.script(),
        other = other,
        others = conjunction(&others, "themself")
    )
    .map_err(AgentError::from)?;
    let d = agent.ask(&Dialogue::new(), team, &warmup).await?;
    let mindopening = d.last().map(|turn| turn.content.clone()).unwrap_or_default();

    let question = match question {
        Some(question) => question.to_string(),
        None => format!("How skilled is {other} at helping others become more open-minded?"),
    };
    let (low, high) = (
        *ctx.config.observer_scale.start(),
        *ctx.config.observer_scale.end(),
    );
    let outcome = agent.rating(&d, team, &question, low, high).await?;

    Ok(Eval::from_scores(outcome.score().map(|score| ("skilled", score)))
        .with_comment("mindopening", Comment::new(&observer.name, mindopening)))
}

/// Everything a campaign produced for one agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignRecord {
    /// Each completed dialogue with its evaluation.
    pub trials: Vec<(Dialogue, Eval)>,
    pub total: Eval,
    /// Trials abandoned because of a precondition violation.
    pub skipped_trials: usize,
    /// Money spent, when a usage tracker was attached.
    pub cost: Option<f64>,
}

/// Campaign results keyed by agent name.
#[derive(Debug, Clone, Default)]
pub struct CampaignStore {
    records: BTreeMap<String, CampaignRecord>,
}

impl CampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&CampaignRecord> {
        self.records.get(name)
    }

    /// Stores `record`, returning the one it replaces.
    pub fn insert(&mut self, name: impl Into<String>, record: CampaignRecord) -> Option<CampaignRecord> {
        self.records.insert(name.into(), record)
    }

    pub fn remove(&mut self, name: &str) -> Option<CampaignRecord> {
        self.records.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CampaignRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Evaluates argubots against a panel of characters and keeps the raw results.
///
/// # Example
///
/// ```rust,ignore
/// use argubot::character::dev_set;
/// use argubot::eval::EvalCampaign;
///
/// let mut campaign = EvalCampaign::new(generator).with_tracker(ledger);
/// let total = campaign.eval_on_characters(&alice, &dev_set()).await?;
/// println!("{total}");
/// ```
pub struct EvalCampaign {
    context: EvalContext,
    judge: Character,
    store: CampaignStore,
    tracker: Option<Arc<dyn UsageTracker>>,
    seed: Option<u64>,
}

impl EvalCampaign {
    /// A campaign with default settings, judged by [`judge()`].
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            context: EvalContext::new(generator),
            judge: judge(),
            store: CampaignStore::new(),
            tracker: None,
            seed: None,
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.context.config = config;
        self
    }

    pub fn with_judge(mut self, judge: Character) -> Self {
        self.judge = judge;
        self
    }

    /// Samples cost before and after each run from `tracker`.
    pub fn with_tracker(mut self, tracker: Arc<dyn UsageTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Makes the choice of conversation starters reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.context.config
    }

    pub fn store(&self) -> &CampaignStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CampaignStore {
        &mut self.store
    }

    /// Simulates `reps` dialogues between `agent` and each character, has
    /// each one judged by the character and by the observer, and returns the
    /// summed evaluation.
    ///
    /// The store entry for `agent` is cleared when the run starts and filled
    /// in when it succeeds. Trials failing on a precondition are skipped. Any
    /// other error aborts the run, leaving no record for `agent`.
    pub async fn eval_on_characters(
        &mut self,
        agent: &dyn Agent,
        characters: &[Character],
    ) -> Result<Eval, EvalError> {
        self.store.remove(agent.name());
        let starting_cost = self.tracker.as_ref().map(|tracker| tracker.current_cost());
        let mut simulator = match self.seed {
            Some(seed) => Simulator::new().with_seed(seed),
            None => Simulator::new(),
        };

        let mut record = CampaignRecord::default();
        for character in characters {
            let participant = CharacterAgent::new(character.clone(), self.context.generator.clone())?;
            for rep in 0..self.context.config.reps {
                match self.trial(&mut simulator, agent, &participant).await {
                    Ok((dialogue, eval)) => {
                        record.total += &eval;
                        record.trials.push((dialogue, eval));
                    }
                    Err(err) if err.is_precondition() => {
                        tracing::warn!(
                            agent = agent.name(),
                            character = %character.name,
                            rep,
                            error = %err,
                            "skipping trial"
                        );
                        record.skipped_trials += 1;
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        if let (Some(start), Some(tracker)) = (starting_cost, &self.tracker) {
            let cost = tracker.current_cost() - start;
            tracing::warn!("You just spent ${cost:.2} to evaluate {}", agent.name());
            record.cost = Some(cost);
        }
        tracing::info!(agent = agent.name(), total = %record.total, "campaign finished");

        let total = record.total.clone();
        self.store.insert(agent.name(), record);
        Ok(total)
    }

    async fn trial(
        &self,
        simulator: &mut Simulator,
        agent: &dyn Agent,
        participant: &CharacterAgent,
    ) -> Result<(Dialogue, Eval), EvalError> {
        let dialogue = simulator
            .simulate(agent, participant, self.context.config.turns)
            .await?;
        tracing::info!(%dialogue, "simulated dialogue");

        let by_participant =
            eval_by_participant(participant.character(), agent.name(), &dialogue, &self.context)
                .await?;
        let by_observer =
            eval_by_observer(&self.judge, agent.name(), &dialogue, None, &self.context).await?;
        let eval = by_participant + by_observer;
        tracing::info!(%eval, "evaluated dialogue");

        Ok((dialogue, eval))
    }
}
