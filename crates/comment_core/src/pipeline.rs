// Pure pieces of the external collector/analyzer supervision: progress text
// parsing and the run-state bookkeeping. Process spawning itself lives with
// the caller, not here.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunState {
    NotStarted,
    Running { progress: f32 },
    Succeeded,
    Failed { exit_code: i32 },
}

impl RunState {
    pub fn start(&mut self) {
        *self = RunState::Running { progress: 0.0 };
    }

    pub fn observe_line(&mut self, line: &str) {
        if let RunState::Running { progress } = self {
            if let Some(parsed) = extract_progress(line) {
                *progress = parsed;
            }
        }
    }

    pub fn finish(&mut self, exit_code: i32) {
        *self = if exit_code == 0 {
            RunState::Succeeded
        } else {
            RunState::Failed { exit_code }
        };
    }

    pub fn progress(&self) -> f32 {
        match self {
            RunState::NotStarted => 0.0,
            RunState::Running { progress } => *progress,
            RunState::Succeeded => 1.0,
            RunState::Failed { .. } => 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Collect,
    Analyze,
}

// The collector owns the first 40% of the combined bar, the analyzer the rest.
pub fn overall_progress(stage: PipelineStage, stage_progress: f32) -> f32 {
    let clamped = stage_progress.clamp(0.0, 1.0);
    match stage {
        PipelineStage::Collect => clamped * 0.4,
        PipelineStage::Analyze => 0.4 + clamped * 0.6,
    }
}

// Pulls the number immediately before a '%' out of tqdm-style output. Commas
// are tolerated as decimal separators; the result is scaled to [0, 1].
pub fn extract_progress(line: &str) -> Option<f32> {
    let chars: Vec<char> = line.chars().collect();
    let percent_index = chars.iter().position(|ch| *ch == '%')?;
    if percent_index == 0 {
        return None;
    }

    let mut start = percent_index;
    while start > 0 {
        let ch = chars[start - 1];
        if ch.is_ascii_digit() || ch == '.' || ch == ',' {
            start -= 1;
        } else {
            break;
        }
    }
    if start == percent_index {
        return None;
    }

    let token: String = chars[start..percent_index].iter().collect();
    let value: f32 = token.replace(',', ".").parse().ok()?;
    Some((value / 100.0).clamp(0.0, 1.0))
}

pub fn is_progress_bar_line(line: &str) -> bool {
    line.contains("%|")
}
