use anyhow::Context;
use blockmotion_physics::PlayerCommands;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

/// Commands held for `ticks` consecutive ticks. `yaw` and `pitch` are
/// applied on every one of those ticks.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScriptedStep {
    pub ticks: u32,
    #[serde(flatten)]
    pub commands: PlayerCommands,
}

/// Replays a list of scripted steps one tick at a time.
///
/// After the last step the player holds no keys.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    ticks_in_step: u32,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        Ok(Self::from_steps(file.steps))
    }

    pub fn from_steps(steps: Vec<ScriptedStep>) -> Self {
        let mut player = Self {
            steps,
            index: 0,
            ticks_in_step: 0,
        };
        player.skip_empty_steps();
        player
    }

    /// Total ticks covered by the script.
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|step| u64::from(step.ticks)).sum()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// Commands for the next tick.
    pub fn advance(&mut self) -> PlayerCommands {
        let Some(step) = self.steps.get(self.index) else {
            return PlayerCommands::default();
        };
        let commands = step.commands;

        self.ticks_in_step += 1;
        if self.ticks_in_step >= step.ticks {
            self.index += 1;
            self.ticks_in_step = 0;
            self.skip_empty_steps();
        }
        commands
    }

    fn skip_empty_steps(&mut self) {
        while self
            .steps
            .get(self.index)
            .is_some_and(|step| step.ticks == 0)
        {
            self.index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_expand_into_per_tick_commands() {
        let mut player = ScriptedInputPlayer::from_json(
            r#"{"steps": [
                {"ticks": 2, "forward": true, "yaw": 5.0},
                {"ticks": 0, "jump": true},
                {"ticks": 1, "jump": true, "run": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(player.total_ticks(), 3);

        let first = player.advance();
        assert!(first.forward);
        assert_eq!(first.yaw, 5.0);
        assert_eq!(player.advance(), first);

        let third = player.advance();
        assert!(third.jump && third.run && !third.forward);
        assert!(player.is_finished());
        assert_eq!(player.advance(), PlayerCommands::default());
    }

    #[test]
    fn empty_script_is_rejected() {
        assert!(ScriptedInputPlayer::from_json(r#"{"steps": []}"#).is_err());
        assert!(ScriptedInputPlayer::from_json("not json").is_err());
    }
}
