use bubbletea_rs::{quit, Cmd, KeyMsg, Model, Msg, Program};
use crossterm::event::{KeyCode, KeyModifiers};
use jobsearch_bar::prelude::*;
use std::fs::File;
use std::sync::{Arc, Mutex};
use tracing::warn;
use tracing_subscriber::EnvFilter;

struct App {
    bar: SearchBar,
    results: Arc<Mutex<Option<Vec<Recommendation>>>>,
}

/// The configured recommender, or `None` to let the bar use its default.
fn recommender() -> Option<Arc<dyn Recommender>> {
    let built = RecommenderConfig::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|config| HttpRecommender::new(config).map_err(anyhow::Error::from));
    match built {
        Ok(r) => Some(Arc::new(r)),
        Err(err) => {
            warn!(error = %err, "invalid recommender configuration, using defaults");
            None
        }
    }
}

impl Model for App {
    fn init() -> (Self, Option<Cmd>) {
        let results = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&results);
        let mut bar = searchbar_new().with_on_results(move |recs| {
            if let Ok(mut slot) = sink.lock() {
                *slot = Some(recs);
            }
        });
        if let Some(recommender) = recommender() {
            bar = bar.with_recommender(recommender);
        }
        bar.set_width(40);
        let cmd = bar.focus();
        (Self { bar, results }, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            if key.key == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Some(quit());
            }
        }
        self.bar.update(msg)
    }

    fn view(&self) -> String {
        let mut out = format!("Find your next role\n\n{}\n\n", self.bar.view());

        if let Ok(results) = self.results.lock() {
            match results.as_ref() {
                None => {}
                Some(recs) if recs.is_empty() => out.push_str("No results.\n"),
                Some(recs) => {
                    out.push_str(&format!("{} recommendations:\n", recs.len()));
                    for rec in recs {
                        let line = ["title", "Job Title", "job_title", "name"]
                            .iter()
                            .find_map(|k| rec.field(k))
                            .map(str::to_string)
                            .unwrap_or_else(|| rec.as_value().to_string());
                        out.push_str(&format!("  • {line}\n"));
                    }
                }
            }
        }

        out.push('\n');
        out.push_str(&self.bar.help_view());
        out.push_str(" • ctrl+c quit\n");
        out
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log = File::create("jobsearch.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    let program = Program::<App>::builder().alt_screen(true).build()?;
    program.run().await?;
    Ok(())
}
