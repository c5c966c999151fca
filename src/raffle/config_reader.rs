use crate::raffle::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputFile {
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct DrawSettings {
    #[serde(rename = "numberOfDraws")]
    pub number_of_draws: Option<u32>,
    // Kept as a string like the other numeric settings of the file.
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<String>,
    #[serde(rename = "revealDurationMs")]
    pub reveal_duration_ms: Option<u64>,
    #[serde(rename = "tickIntervalMs")]
    pub tick_interval_ms: Option<u64>,
    pub animate: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RaffleConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputFile")]
    pub input_file: Option<InputFile>,
    #[serde(rename = "drawSettings", default)]
    pub draw_settings: DrawSettings,
}

impl DrawSettings {
    pub fn seed(&self) -> RaffleResult<Option<u64>> {
        match &self.random_seed {
            None => Ok(None),
            Some(s) => s
                .trim()
                .parse::<u64>()
                .map(Some)
                .ok()
                .context(ParsingJsonNumberSnafu {
                    field: "randomSeed",
                    value: s.clone(),
                }),
        }
    }
}

pub fn read_config(path: &str) -> RaffleResult<RaffleConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RaffleConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Reads a summary written by a previous run, for comparison.
///
/// The timestamps are removed since they never match from one run to the next.
pub fn read_summary(path: &str) -> RaffleResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(strip_timestamps(js))
}

pub fn strip_timestamps(mut js: JSValue) -> JSValue {
    if let Some(results) = js.get_mut("results").and_then(|r| r.as_array_mut()) {
        for r in results.iter_mut() {
            if let Some(obj) = r.as_object_mut() {
                obj.remove("timestamp");
            }
        }
    }
    js
}
