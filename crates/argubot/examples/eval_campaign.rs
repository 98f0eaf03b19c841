//! Evaluates a few argubots against the development characters.
//!
//! Run with: `OPENAI_API_KEY=... cargo run --example eval_campaign --features openai-api`

use argubot::BoxedAgent;
use argubot::agent::{AkikiAgent, ConstantAgent, KialoAgent, LLMAgent};
use argubot::character::dev_set;
use argubot::claims::ClaimCorpus;
use argubot::eval::EvalCampaign;
use argubot::llm::{OpenAIGenerator, UsageLedger};
use argubot::observability::{self, ObservabilityConfig};
use std::sync::Arc;
use tracing::Level;

fn corpus() -> ClaimCorpus {
    let mut corpus = ClaimCorpus::new();
    corpus.add_claim("Eating meat is morally wrong.");
    corpus.add_con(
        "Eating meat is morally wrong.",
        "Humans evolved as omnivores, and meat is part of a healthy diet for many people.",
    );
    corpus.add_pro(
        "Eating meat is morally wrong.",
        "Factory farming causes enormous animal suffering.",
    );
    corpus.add_claim("People should be allowed to own guns.");
    corpus.add_con(
        "People should be allowed to own guns.",
        "Countries with strict gun laws have far fewer gun deaths.",
    );
    corpus.add_claim("Climate change is a hoax.");
    corpus.add_con(
        "Climate change is a hoax.",
        "Independent temperature records from around the world show consistent warming.",
    );
    corpus.add_claim("Social media makes people less happy.");
    corpus.add_con(
        "Social media makes people less happy.",
        "Social media helps isolated people find communities that support them.",
    );
    corpus
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init(ObservabilityConfig::default().with_level(Level::INFO))?;

    let ledger = Arc::new(UsageLedger::new());
    let generator = Arc::new(
        OpenAIGenerator::try_from_env()?
            .with_pricing(0.15, 0.60)
            .with_usage_ledger(ledger.clone()),
    );
    let claims = Arc::new(corpus());

    let argubots: Vec<BoxedAgent> = vec![
        Box::new(ConstantAgent::new("Airhead", "I know right???")),
        Box::new(KialoAgent::new("Akiko", claims.clone())),
        Box::new(AkikiAgent::new("Akiki", claims)),
        Box::new(LLMAgent::new("Alice", generator.clone()).with_system(
            "You are an intelligent bot who wants to broaden your user's mind. \
             Ask a conversation starter question. Then, WHATEVER position the user \
             initially takes, push back on it. Try to help the user see the other \
             side of the issue. Answer in 1-2 sentences. Be thoughtful and polite.",
        )),
    ];

    let mut campaign = EvalCampaign::new(generator).with_tracker(ledger.clone());
    let characters = dev_set();
    for argubot in &argubots {
        let total = campaign
            .eval_on_characters(argubot.as_ref(), &characters)
            .await?;
        println!("{} => {total}\n", argubot.name());
    }

    for (name, record) in campaign.store().iter() {
        println!(
            "{name}: TOTAL {:.2} over {} dialogues ({} skipped)",
            record.total.mean()["TOTAL"],
            record.trials.len(),
            record.skipped_trials
        );
    }
    println!("Total usage: {:?}", ledger.snapshot());

    Ok(())
}
