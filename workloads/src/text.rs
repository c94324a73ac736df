//! Text family workloads.
//!
//! A scenario id decodes as `id % 8` for the operation, `(id / 8) % 4` for the target length in
//! characters and `id / 32` for the content, ASCII or multi-byte UTF-8.

use crate::containers::{InlineString, NullText, Text};
use crate::{measure_candidate, scenario_rng};
use container_bench_runner::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;
use std::hint::black_box;

const SCENARIO_COUNT: u32 = 64;
const LENGTHS: [usize; 4] = [8, 23, 63, 200];
const FRAGMENT_CHARS: usize = 4;

const ASCII_ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ' ',
];
const UTF8_ALPHABET: &[char] = &[
    'ä', 'ö', 'ü', 'ß', 'é', 'ñ', 'ç', 'λ', 'π', 'ж', 'ш', '€', '中', '文', 'a', ' ',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    PushCharsThenClear,
    AppendFragments,
    Clone,
    CompareEqual,
    Find,
    InsertFront,
    TruncateThenRegrow,
    FormattedWrite,
}

const OPERATIONS: [Operation; 8] = [
    Operation::PushCharsThenClear,
    Operation::AppendFragments,
    Operation::Clone,
    Operation::CompareEqual,
    Operation::Find,
    Operation::InsertFront,
    Operation::TruncateThenRegrow,
    Operation::FormattedWrite,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Content {
    Ascii,
    Utf8,
}

impl Content {
    fn alphabet(&self) -> &'static [char] {
        match self {
            Content::Ascii => ASCII_ALPHABET,
            Content::Utf8 => UTF8_ALPHABET,
        }
    }

    fn generate(&self, chars: usize, rng: &mut StdRng) -> String {
        let alphabet = self.alphabet();
        (0..chars)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextScenario {
    id: ScenarioId,
    operation: Operation,
    chars: usize,
    content: Content,
}

/// Input data shared by every candidate of a scenario.
struct Input {
    source: String,
    fragments: Vec<String>,
    /// Byte offset of the middle character of `source`.
    middle: usize,
}

impl Input {
    fn new(scenario: &TextScenario) -> Self {
        let mut rng = scenario_rng(DataTypeFamily::Text, scenario.id);
        let source = scenario.content.generate(scenario.chars, &mut rng);

        let chars = source.chars().collect::<Vec<_>>();
        let fragments = chars
            .chunks(FRAGMENT_CHARS)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect();
        let middle = source
            .char_indices()
            .nth(scenario.chars / 2)
            .map_or(source.len(), |(i, _)| i);

        Self {
            source,
            fragments,
            middle,
        }
    }

    /// The last fragment, which a search has to scan the whole text to find.
    fn needle(&self) -> &str {
        self.fragments.last().map_or("", String::as_str)
    }
}

impl TextScenario {
    fn decode(id: ScenarioId) -> Option<Self> {
        let raw = id.get();
        if raw >= SCENARIO_COUNT {
            return None;
        }

        Some(Self {
            id,
            operation: OPERATIONS[(raw % 8) as usize],
            chars: LENGTHS[((raw / 8) % 4) as usize],
            content: if raw / 32 == 0 {
                Content::Ascii
            } else {
                Content::Utf8
            },
        })
    }

    fn name(&self) -> String {
        let content = match self.content {
            Content::Ascii => "ascii",
            Content::Utf8 => "utf8",
        };
        let n = self.chars;
        let operation = match self.operation {
            Operation::PushCharsThenClear => format!("push {n} chars then clear"),
            Operation::AppendFragments => format!("append {n} chars in fragments"),
            Operation::Clone => format!("clone {n} chars"),
            Operation::CompareEqual => format!("compare {n} chars"),
            Operation::Find => format!("find in {n} chars"),
            Operation::InsertFront => format!("insert {n} chars at front"),
            Operation::TruncateThenRegrow => format!("truncate {n} chars then regrow"),
            Operation::FormattedWrite => format!("format {n} chars"),
        };

        format!("text<{content}>: {operation}")
    }

    fn run<T: Text>(
        &self,
        bench: &mut Bench,
        candidate: &Candidate,
    ) -> Result<(), MeasurementError> {
        let input = Input::new(self);
        let full = filled::<T>(&input.source);

        match self.operation {
            Operation::PushCharsThenClear => measure_candidate(bench, candidate, || {
                let mut text = T::new();
                for ch in input.source.chars() {
                    text.push(ch);
                }
                black_box(&text);
                text.clear();
                black_box(text);
            }),
            Operation::AppendFragments => measure_candidate(bench, candidate, || {
                let mut text = T::new();
                for fragment in &input.fragments {
                    text.push_str(fragment);
                }
                black_box(text);
            }),
            Operation::Clone => measure_candidate(bench, candidate, || {
                black_box(black_box(&full).clone());
            }),
            Operation::CompareEqual => {
                let other = filled::<T>(&input.source);
                measure_candidate(bench, candidate, || {
                    black_box(black_box(&full) == black_box(&other));
                })
            }
            Operation::Find => {
                let needle = input.needle();
                measure_candidate(bench, candidate, || {
                    black_box(black_box(&full).find(needle));
                })
            }
            Operation::InsertFront => measure_candidate(bench, candidate, || {
                let mut text = T::new();
                for fragment in input.fragments.iter().rev() {
                    text.insert_str(0, fragment);
                }
                black_box(text);
            }),
            Operation::TruncateThenRegrow => {
                let mut text = full.clone();
                let tail = &input.source[input.middle..];
                measure_candidate(bench, candidate, || {
                    text.truncate(input.middle);
                    text.push_str(tail);
                    black_box(&text);
                })
            }
            Operation::FormattedWrite => measure_candidate(bench, candidate, || {
                let mut text = T::new();
                for (i, fragment) in input.fragments.iter().enumerate() {
                    black_box(write!(text, "{fragment}{}", i % 10).is_ok());
                }
                black_box(text);
            }),
        }
    }
}

fn filled<T: Text>(source: &str) -> T {
    let mut text = T::with_capacity(source.len());
    text.push_str(source);
    text
}

/// The text family: `String`, `InlineString` and the null text over ASCII and multi-byte
/// content.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextWorkloads;

impl TextWorkloads {
    /// The name of `scenario` without running it.
    pub fn scenario_name(&self, scenario: ScenarioId) -> Result<String, WorkloadError> {
        TextScenario::decode(scenario)
            .map(|s| s.name())
            .ok_or(WorkloadError::UnknownScenario(scenario))
    }
}

impl WorkloadProvider for TextWorkloads {
    fn family(&self) -> DataTypeFamily {
        DataTypeFamily::Text
    }

    fn scenario_count(&self) -> u32 {
        SCENARIO_COUNT
    }

    fn run(
        &self,
        bench: &mut Bench,
        candidate: &Candidate,
        scenario: ScenarioId,
    ) -> Result<String, WorkloadError> {
        let workload =
            TextScenario::decode(scenario).ok_or(WorkloadError::UnknownScenario(scenario))?;

        match candidate.kind() {
            ContainerKind::Null => workload.run::<NullText>(bench, candidate)?,
            ContainerKind::StdString => workload.run::<String>(bench, candidate)?,
            ContainerKind::InlineString24 => workload.run::<InlineString<24>>(bench, candidate)?,
            ContainerKind::InlineString64 => workload.run::<InlineString<64>>(bench, candidate)?,
            kind => {
                return Err(WorkloadError::UnsupportedContainer {
                    kind,
                    family: DataTypeFamily::Text,
                })
            }
        }

        Ok(workload.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn input_matches_the_requested_length() {
        for id in ScenarioId::range(SCENARIO_COUNT) {
            let scenario = TextScenario::decode(id).unwrap();
            let input = Input::new(&scenario);

            assert_eq!(scenario.chars, input.source.chars().count());
            assert_eq!(input.source, input.fragments.concat());
            assert!(input.source.is_char_boundary(input.middle));
        }
    }

    #[test]
    fn multi_byte_scenarios_use_wide_characters() {
        let ascii = Input::new(&TextScenario::decode(ScenarioId::new(8)).unwrap());
        let utf8 = Input::new(&TextScenario::decode(ScenarioId::new(40)).unwrap());

        assert!(ascii.source.is_ascii());
        assert!(utf8.source.len() > utf8.source.chars().count());
    }

    #[test]
    fn input_is_reproducible() {
        let scenario = TextScenario::decode(ScenarioId::new(45)).unwrap();

        assert_eq!(Input::new(&scenario).source, Input::new(&scenario).source);
    }

    #[test]
    fn names_are_stable() {
        let provider = TextWorkloads;

        assert_eq!(
            "text<ascii>: push 8 chars then clear",
            provider.scenario_name(ScenarioId::new(0)).unwrap()
        );
        assert_eq!(
            "text<utf8>: format 200 chars",
            provider.scenario_name(ScenarioId::new(63)).unwrap()
        );
        assert!(provider.scenario_name(ScenarioId::new(64)).is_err());
    }

    #[test]
    fn compare_equal_runs_on_every_text_container() {
        let config = BenchConfig::default()
            .clock_resolution_multiple(1)
            .epochs(2)
            .max_epoch_time(std::time::Duration::from_micros(10));
        let candidates = [
            Candidate::baseline(),
            Candidate::reference("std", ContainerKind::StdString),
            Candidate::subject("inline24", ContainerKind::InlineString24),
            Candidate::subject("inline64", ContainerKind::InlineString64),
        ];

        for id in [3, 35] {
            let scenario = ScenarioId::new(id);
            assert_eq!(
                Operation::CompareEqual,
                TextScenario::decode(scenario).unwrap().operation
            );

            let mut bench = Bench::new(DataTypeFamily::Text, scenario, config.clone()).unwrap();
            for candidate in &candidates {
                TextWorkloads.run(&mut bench, candidate, scenario).unwrap();
            }
            assert_eq!(0, bench.finalize().failures().count());
        }
    }
}
