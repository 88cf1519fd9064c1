use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::curve::{Curve, CurveSet, EquationRecord};
use crate::error::{HapticsError, Result};
use crate::expression::{Expr, preset_for_text};
use crate::visualization::{curve_color, history_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    #[default]
    Last,
    All,
}

/// An edit to the curve set, in the JSON shape the command parser emits:
/// `{"action": "add_graph", "name": ..., "equation_str": ..., "lambda_str": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CurveCommand {
    AddGraph {
        name: String,
        /// Display form of the equation.
        equation_str: String,
        /// Evaluated form (`lambda x: np.sin(x/50) * 100`); the curve is
        /// sampled from this when present, else from `equation_str`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lambda_str: Option<String>,
        #[serde(default)]
        description: String,
        /// Set for commands produced by the keyword fallback.
        #[serde(skip)]
        keyword_fallback: bool,
    },
    DeleteGraph {
        #[serde(default)]
        mode: DeleteMode,
    },
    /// `index` is 1-based, as spoken.
    ToggleGraph {
        #[serde(default = "default_toggle_index")]
        index: usize,
    },
    Unknown {
        #[serde(default)]
        description: String,
    },
}

fn default_toggle_index() -> usize {
    1
}

const DELETE_KEYWORDS: [&str; 5] = ["삭제", "지워", "delete", "remove", "clear"];
const ALL_KEYWORDS: [&str; 4] = ["전부", "모두", "all", "clear"];
const TOGGLE_KEYWORDS: [&str; 6] = ["toggle", "hide", "show", "숨겨", "보여", "토글"];
const GRAPH_WORDS: [&str; 4] = ["graph", "curve", "그래프", "곡선"];

impl CurveCommand {
    /// Parses a JSON command, tolerating a surrounding markdown code fence.
    pub fn from_json(text: &str) -> Result<CurveCommand> {
        let mut body = text.trim();
        if let Some((_, rest)) = body.split_once("```json") {
            body = rest.split("```").next().unwrap_or(rest);
        } else if let Some((_, rest)) = body.split_once("```") {
            body = rest.split("```").next().unwrap_or(rest);
        }
        Ok(serde_json::from_str(body.trim())?)
    }

    /// Keyword fallback for plain text commands.
    ///
    /// A toggle needs a graph reference ("graph 2", "2번", "#2"); a bare
    /// number only counts when the text names no preset, so "show me a
    /// parabola like x^2" still adds a parabola.
    pub fn from_text(text: &str) -> CurveCommand {
        let lower = text.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));
        if has(&DELETE_KEYWORDS) {
            let mode = if has(&ALL_KEYWORDS) {
                DeleteMode::All
            } else {
                DeleteMode::Last
            };
            return CurveCommand::DeleteGraph { mode };
        }
        let preset = preset_for_text(&lower);
        if has(&TOGGLE_KEYWORDS) {
            let index = graph_reference(&lower).or_else(|| match preset {
                Some(_) => None,
                None => first_number(&lower),
            });
            if let Some(index) = index {
                return CurveCommand::ToggleGraph { index };
            }
        }
        match preset {
            Some(preset) => CurveCommand::AddGraph {
                name: preset.name.to_string(),
                equation_str: preset.equation.to_string(),
                lambda_str: None,
                description: format!("from {:?}", text),
                keyword_fallback: true,
            },
            None => {
                log::warn!("no graph command recognised in {:?}", text);
                CurveCommand::Unknown {
                    description: text.to_string(),
                }
            }
        }
    }

    /// JSON when the text looks like JSON, keyword matching otherwise.
    pub fn parse(text: &str) -> Result<CurveCommand> {
        let trimmed = text.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with("```") {
            CurveCommand::from_json(trimmed)
        } else {
            Ok(CurveCommand::from_text(trimmed))
        }
    }
}

fn parse_digits(word: &str) -> Option<usize> {
    word.trim_matches(|c: char| !c.is_ascii_digit()).parse().ok()
}

/// A number explicitly attached to a graph word.
fn graph_reference(text: &str) -> Option<usize> {
    let words: Vec<&str> = text.split_whitespace().collect();
    for (i, word) in words.iter().enumerate() {
        let numbered = word
            .strip_suffix("번째")
            .or_else(|| word.strip_suffix("번"))
            .or_else(|| word.strip_prefix('#'));
        if let Some(index) = numbered.and_then(|w| w.parse().ok()) {
            return Some(index);
        }
        if GRAPH_WORDS.iter().any(|g| word.starts_with(g)) {
            if let Some(index) = words.get(i + 1).and_then(|w| parse_digits(w)) {
                return Some(index);
            }
        }
    }
    None
}

fn first_number(text: &str) -> Option<usize> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CommandOutcome {
    Added { index: usize },
    Removed { count: usize },
    Toggled { index: usize, visible: bool },
    Ignored { reason: String },
}

impl CurveSet {
    /// Applies an authoring command.
    ///
    /// New curves are sampled once here using the config's x range, sample
    /// count, plane and default thickness. Parsed (non-fallback) equations
    /// are recorded in the history and colored by history length.
    pub fn apply(
        &mut self,
        command: &CurveCommand,
        config: &TrackerConfig,
    ) -> Result<CommandOutcome> {
        match command {
            CurveCommand::AddGraph {
                name,
                equation_str,
                lambda_str,
                keyword_fallback,
                ..
            } => {
                let expr = Expr::parse(lambda_str.as_deref().unwrap_or(equation_str))?;
                let color = if *keyword_fallback {
                    curve_color(self.len())
                } else {
                    history_color(self.equation_history().len())
                };
                let mut curve = Curve::from_expression(
                    name,
                    &expr,
                    config.curve_x_range_mm,
                    config.curve_samples,
                    config.curve_plane_z_mm,
                    config.default_thickness_mm,
                    color,
                );
                curve.equation = Some(equation_str.clone());
                if !keyword_fallback {
                    self.record_equation(EquationRecord {
                        name: name.clone(),
                        equation_str: equation_str.clone(),
                        lambda_str: lambda_str.clone(),
                    });
                }
                Ok(CommandOutcome::Added {
                    index: self.push(curve),
                })
            }
            CurveCommand::DeleteGraph { mode } => {
                let count = match mode {
                    DeleteMode::Last => self.pop().map_or(0, |_| 1),
                    DeleteMode::All => self.clear(),
                };
                Ok(CommandOutcome::Removed { count })
            }
            CurveCommand::ToggleGraph { index } => {
                let zero_based = index.checked_sub(1).ok_or(HapticsError::CurveIndex {
                    index: *index,
                    len: self.len(),
                })?;
                let visible = self.toggle_visibility(zero_based)?;
                Ok(CommandOutcome::Toggled {
                    index: zero_based,
                    visible,
                })
            }
            CurveCommand::Unknown { description } => Ok(CommandOutcome::Ignored {
                reason: description.clone(),
            }),
        }
    }

    /// Parses and applies one command line.
    ///
    /// A line that fails to parse or apply is logged and skipped.
    pub fn apply_text(&mut self, text: &str, config: &TrackerConfig) -> Option<CommandOutcome> {
        match CurveCommand::parse(text).and_then(|command| self.apply(&command, config)) {
            Ok(outcome) => {
                log::info!("{:?} -> {:?}", text, outcome);
                Some(outcome)
            }
            Err(e) => {
                log::warn!("skipping command {:?}: {}", text, e);
                None
            }
        }
    }
}
