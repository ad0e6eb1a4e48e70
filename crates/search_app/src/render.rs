use std::io::{self, Write};

use search_core::{FetchState, RenderMode, SearchViewModel};
use serde_json::json;

pub fn render(view: &SearchViewModel) -> Vec<String> {
    match &view.mode {
        RenderMode::Idle => Vec::new(),
        RenderMode::Error(message) => vec![format!("Error: {message}")],
        RenderMode::Loading => vec!["Searching...".to_string()],
        RenderMode::Empty => vec!["No results found.".to_string()],
        RenderMode::Results => {
            let mut lines = Vec::with_capacity(1 + view.results.len() * 3);
            lines.push(format!(
                "query time: {} | total hits: {}",
                view.query_time, view.total_hits
            ));
            for (index, hit) in view.results.iter().enumerate() {
                lines.push(format!("{:>3}. {}", index + 1, hit.title));
                lines.push(format!("     ({})", hit.url));
                lines.push(format!("     {} | {}", hit.keywords, hit.score));
            }
            lines
        }
    }
}

/// One JSON line per settled search; nothing for idle or loading.
pub fn render_json(fetch: &FetchState) -> Option<String> {
    match fetch {
        FetchState::Success(response) => serde_json::to_string(response).ok(),
        FetchState::Error(message) => Some(json!({ "error": message }).to_string()),
        FetchState::Idle | FetchState::Loading => None,
    }
}

/// Writes renderings, skipping one identical to what is already on screen.
///
/// An empty rendering (idle, or loading in JSON mode) clears the screen
/// memory, so the next settlement is always written even when it repeats
/// the previous one.
pub struct Printer {
    json: bool,
    last: Vec<String>,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            last: Vec::new(),
        }
    }

    pub fn print(
        &mut self,
        out: &mut impl Write,
        view: &SearchViewModel,
        fetch: &FetchState,
    ) -> io::Result<()> {
        let lines: Vec<String> = if self.json {
            render_json(fetch).into_iter().collect()
        } else {
            render(view)
        };
        if lines.is_empty() {
            self.last.clear();
            return Ok(());
        }
        if lines == self.last {
            return Ok(());
        }
        for line in &lines {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        self.last = lines;
        Ok(())
    }
}
