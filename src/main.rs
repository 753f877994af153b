//! Interactive demo session on the console.
//!
//! Wires the HTTP collaborators, the filesystem profile store, and the
//! console answer collector around the elicitation engine, then walks one
//! user through a plan-choosing decision. The design oracle and inference
//! endpoints are optional: without them the session degrades to
//! deterministic orthogonal questions and skips reconciliation.

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use preference_compass::adapters::console::ConsoleAnswerCollector;
use preference_compass::adapters::inference::{HttpInferenceSampler, InferenceHttpConfig};
use preference_compass::adapters::oracle::{HttpDesignOracle, OracleHttpConfig};
use preference_compass::adapters::profile::FsProfileStore;
use preference_compass::application::SessionRunner;
use preference_compass::config::AppConfig;
use preference_compass::domain::criteria::{CriteriaSet, Criterion, LevelKey};
use preference_compass::domain::foundation::UserId;
use preference_compass::domain::recommendation::RealChoice;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    let set = CriteriaSet::new(vec![
        Criterion::new("Price", ["low", "mid", "high"])?,
        Criterion::new("Speed", ["slow", "medium", "fast"])?,
        Criterion::new("Support", ["basic", "standard", "premium"])?,
    ])?;
    let real_choices = vec![
        RealChoice::new("Budget plan", set.profile_from_indices(&[0, 0, 0])?),
        RealChoice::new("Balanced plan", set.profile_from_indices(&[1, 1, 1])?),
        RealChoice::new("Premium plan", set.profile_from_indices(&[2, 2, 2])?),
    ];

    let mut oracle_config = OracleHttpConfig::new(config.oracle.base_url.clone())
        .with_timeout(config.oracle.timeout());
    if let Some(key) = &config.oracle.api_key {
        oracle_config = oracle_config.with_api_key(key.clone());
    }
    let oracle = Arc::new(HttpDesignOracle::new(oracle_config)?);

    let mut inference_config = InferenceHttpConfig::new(config.inference.base_url.clone())
        .with_timeout(config.inference.timeout());
    if let Some(key) = &config.inference.api_key {
        inference_config = inference_config.with_api_key(key.clone());
    }
    let sampler = Arc::new(HttpInferenceSampler::new(inference_config)?);

    let profiles = Arc::new(FsProfileStore::new(&config.profile.base_dir));
    let answers = Arc::new(ConsoleAnswerCollector::new());

    let runner = SessionRunner::new(config.engine.clone(), oracle, answers, sampler, profiles);

    let user = UserId::new(config.profile.default_user.clone())?;
    let report = runner.run(&user, set.clone(), real_choices, None).await?;

    println!();
    if report.outcome.converged {
        println!(
            "Preferences converged after {} questions.",
            report.outcome.questions_asked
        );
    } else {
        println!(
            "Session complete after {} questions.",
            report.outcome.questions_asked
        );
    }

    println!("\nYour options, ranked by what your answers revealed:");
    for (rank, choice) in report.ranking.iter().enumerate() {
        println!("  {}. {} (utility {:+.2})", rank + 1, choice.name, choice.score);
    }

    println!("\nWhat the session learned about each attribute:");
    for (index, criterion) in set.criteria().iter().enumerate() {
        println!("  {}:", criterion.name());
        for (level, name) in criterion.levels().iter().enumerate() {
            let belief = report.outcome.beliefs.get(LevelKey::new(index, level));
            println!(
                "    - {:<10} mean {:+.2}, variance {:.2}",
                name, belief.mean, belief.variance
            );
        }
    }

    if report.profile_updated {
        println!("\nYour long-term preference profile has been updated.");
    } else {
        println!("\nYour long-term preference profile is unchanged.");
    }

    Ok(())
}
