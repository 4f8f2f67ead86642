use anyhow::Result;

use crate::Turn;

use super::super::Container;

pub struct HistoryController<'a> {
    container: &'a Container,
}

impl<'a> HistoryController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn history(&self, session_id: String) -> Result<String> {
        let use_case = self.container.history_use_case();
        let turns = use_case.execute(&session_id).await?;
        Ok(self.format_history(&session_id, &turns, use_case.limit()))
    }

    fn format_history(&self, session_id: &str, turns: &[Turn], limit: usize) -> String {
        if turns.is_empty() {
            return format!("No history for session {}.", session_id.trim());
        }

        let mut output = format!(
            "Session {} ({} of {} retained turns):\n\n",
            session_id.trim(),
            turns.len(),
            limit
        );
        for (i, turn) in turns.iter().enumerate() {
            output.push_str(&format!("{:>3}. [{}] {}\n", i + 1, turn.role(), turn.content()));
        }
        output
    }
}
