//! Hunting-themed arithmetic questions.
//!
//! Each template produces a word problem with randomized values. Tier 1 covers
//! single operations, tier 2 introduces multi-step reasoning and simple
//! fractions, tier 3 adds fractions of quantities, percentages and ratios.
//! Answers are `f64` because a few division templates produce non-integers;
//! compare them with [`answers_match`].

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::ANSWER_EPSILON;
use crate::error::EngineError;
use crate::pacing::DifficultyTier;

/// Topic filter chosen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MathTopic {
    #[default]
    All,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Fractions,
    Percentages,
    MultiStep,
}

impl MathTopic {
    pub const ALL: [Self; 8] = [
        Self::All,
        Self::Addition,
        Self::Subtraction,
        Self::Multiplication,
        Self::Division,
        Self::Fractions,
        Self::Percentages,
        Self::MultiStep,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
            Self::Fractions => "fractions",
            Self::Percentages => "percentages",
            Self::MultiStep => "multi_step",
        }
    }

    /// `None` for the catch-all topic, otherwise the topic to filter on.
    #[must_use]
    pub const fn as_filter(self) -> Option<Self> {
        match self {
            Self::All => None,
            other => Some(other),
        }
    }
}

impl fmt::Display for MathTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MathTopic {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s)
            .ok_or_else(|| EngineError::InvalidTopic(s.to_string()))
    }
}

/// A generated question ready to be displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub answer: f64,
    pub hint: String,
    pub tier: DifficultyTier,
    pub topic: MathTopic,
}

struct Generated {
    text: String,
    answer: f64,
    hint: String,
}

struct Template {
    tier: u8,
    topic: MathTopic,
    generate: fn(&mut dyn RngCore) -> Generated,
}

const TEMPLATES: [Template; 18] = [
    // Tier 1: single operations
    Template {
        tier: 1,
        topic: MathTopic::Multiplication,
        generate: groups_of_animals,
    },
    Template {
        tier: 1,
        topic: MathTopic::Subtraction,
        generate: arrows_left,
    },
    Template {
        tier: 1,
        topic: MathTopic::Division,
        generate: split_meat,
    },
    Template {
        tier: 1,
        topic: MathTopic::Multiplication,
        generate: feathers_needed,
    },
    Template {
        tier: 1,
        topic: MathTopic::Addition,
        generate: paces_walked,
    },
    Template {
        tier: 1,
        topic: MathTopic::Multiplication,
        generate: snare_bait,
    },
    // Tier 2: multi-step, intro fractions
    Template {
        tier: 2,
        topic: MathTopic::Division,
        generate: arrow_drop,
    },
    Template {
        tier: 2,
        topic: MathTopic::Fractions,
        generate: unit_fraction_of_arrows,
    },
    Template {
        tier: 2,
        topic: MathTopic::Multiplication,
        generate: elk_drift,
    },
    Template {
        tier: 2,
        topic: MathTopic::MultiStep,
        generate: arrow_batches,
    },
    Template {
        tier: 2,
        topic: MathTopic::Division,
        generate: pelt_trade,
    },
    Template {
        tier: 2,
        topic: MathTopic::MultiStep,
        generate: track_gaps,
    },
    // Tier 3: fractions, decimals, ratios
    Template {
        tier: 3,
        topic: MathTopic::Fractions,
        generate: fraction_of_arrows,
    },
    Template {
        tier: 3,
        topic: MathTopic::MultiStep,
        generate: arrowhead_trade,
    },
    Template {
        tier: 3,
        topic: MathTopic::Percentages,
        generate: cord_reserve,
    },
    Template {
        tier: 3,
        topic: MathTopic::Multiplication,
        generate: camp_rations,
    },
    Template {
        tier: 3,
        topic: MathTopic::Division,
        generate: wind_drift,
    },
    Template {
        tier: 3,
        topic: MathTopic::Fractions,
        generate: pemmican_ratio,
    },
];

/// Pick a template at or below `tier` and generate a question from it.
///
/// When `topic` names a specific topic and at least one eligible template
/// covers it, selection is restricted to that topic; otherwise every eligible
/// template is a candidate.
pub fn generate_question<R>(tier: DifficultyTier, topic: MathTopic, rng: &mut R) -> Question
where
    R: RngCore,
{
    let eligible: Vec<&Template> = TEMPLATES.iter().filter(|t| t.tier <= tier.get()).collect();
    let filtered: Vec<&Template> = match topic.as_filter() {
        Some(wanted) => eligible
            .iter()
            .copied()
            .filter(|t| t.topic == wanted)
            .collect(),
        None => Vec::new(),
    };
    let pool = if filtered.is_empty() {
        &eligible
    } else {
        &filtered
    };

    // Tier 1 always has templates, so the pool is never empty.
    let template = pool[rng.random_range(0..pool.len())];
    let generated = (template.generate)(rng);
    Question {
        text: generated.text,
        answer: generated.answer,
        hint: generated.hint,
        tier: DifficultyTier::new(template.tier),
        topic: template.topic,
    }
}

/// Compare free-form player input against an expected answer. Input that does
/// not parse as a finite number never matches.
#[must_use]
pub fn answers_match(input: &str, expected: f64) -> bool {
    parse_answer(input).is_some_and(|value| (value - expected).abs() < ANSWER_EPSILON)
}

/// Parse the number leading free-form input, so `"12 arrows"` reads as 12.
/// Empty, non-numeric or non-finite text yields `None`.
#[must_use]
pub fn parse_answer(input: &str) -> Option<f64> {
    numeric_prefix(input.trim_start())
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Longest prefix of `text` shaped like a decimal number with an optional
/// sign, fraction and exponent.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return "";
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    &text[..end]
}

fn int(rng: &mut dyn RngCore, min: u32, max: u32) -> u32 {
    rng.random_range(min..=max)
}

fn pick<T: Copy>(rng: &mut dyn RngCore, options: &[T]) -> T {
    options[rng.random_range(0..options.len())]
}

fn groups_of_animals(rng: &mut dyn RngCore) -> Generated {
    let animal = pick(rng, &["rabbit", "quail", "turkey", "squirrel"]);
    let packs = int(rng, 2, 5);
    let per_pack = int(rng, 2, 6);
    Generated {
        text: format!(
            "You spot {packs} groups of {animal}s with {per_pack} in each group. How many {animal}s total?"
        ),
        answer: f64::from(packs * per_pack),
        hint: format!("{packs} × {per_pack}"),
    }
}

fn arrows_left(rng: &mut dyn RngCore) -> Generated {
    let total = int(rng, 12, 30);
    let used = int(rng, 3, total - 2);
    Generated {
        text: format!(
            "You started with {total} arrows. You've shot {used}. How many arrows do you have left?"
        ),
        answer: f64::from(total - used),
        hint: format!("{total} − {used}"),
    }
}

fn split_meat(rng: &mut dyn RngCore) -> Generated {
    let meat = int(rng, 10, 30);
    let families: u32 = pick(rng, &[2, 3, 4, 5, 6]);
    let total = meat * families;
    Generated {
        text: format!(
            "You have {total} pieces of meat to split equally among {families} families. How many pieces does each family get?"
        ),
        answer: f64::from(meat),
        hint: format!("{total} ÷ {families}"),
    }
}

fn feathers_needed(rng: &mut dyn RngCore) -> Generated {
    let per_arrow: u32 = pick(rng, &[2, 3, 4]);
    let arrows = int(rng, 3, 8);
    Generated {
        text: format!(
            "Each arrow needs {per_arrow} feathers. You want to make {arrows} arrows. How many feathers do you need?"
        ),
        answer: f64::from(per_arrow * arrows),
        hint: format!("{per_arrow} × {arrows}"),
    }
}

fn paces_walked(rng: &mut dyn RngCore) -> Generated {
    let north = int(rng, 15, 50);
    let east = int(rng, 10, 40);
    Generated {
        text: format!(
            "You walked {north} paces to the north and {east} paces to the east. How many paces did you walk in total?"
        ),
        answer: f64::from(north + east),
        hint: format!("{north} + {east}"),
    }
}

fn snare_bait(rng: &mut dyn RngCore) -> Generated {
    let traps = int(rng, 3, 7);
    let bait = int(rng, 2, 4);
    Generated {
        text: format!(
            "You're setting {traps} snares. Each one needs {bait} pieces of bait. How much bait do you need?"
        ),
        answer: f64::from(traps * bait),
        hint: format!("{traps} × {bait}"),
    }
}

fn arrow_drop(rng: &mut dyn RngCore) -> Generated {
    let distance: u32 = pick(rng, &[60, 80, 100, 120, 150]);
    let divisor: u32 = pick(rng, &[10, 15, 20]);
    Generated {
        text: format!(
            "The deer is {distance} paces away. Your arrow drops 1 pace for every {divisor} paces of distance. How many paces does the arrow drop?"
        ),
        answer: f64::from(distance) / f64::from(divisor),
        hint: format!("{distance} ÷ {divisor}"),
    }
}

fn unit_fraction_of_arrows(rng: &mut dyn RngCore) -> Generated {
    let total: u32 = pick(rng, &[12, 18, 24, 30]);
    let fraction: u32 = pick(rng, &[2, 3, 4]);
    Generated {
        text: format!(
            "You used 1/{fraction} of your {total} arrows on the morning hunt. How many did you use?"
        ),
        answer: f64::from(total) / f64::from(fraction),
        hint: format!("{total} ÷ {fraction}"),
    }
}

fn elk_drift(rng: &mut dyn RngCore) -> Generated {
    let speed = int(rng, 5, 12);
    let breaths = int(rng, 2, 5);
    let distance = int(rng, 40, 100);
    Generated {
        text: format!(
            "The elk moves {speed} paces every breath. You need {breaths} breaths to aim. It's {distance} paces away. How far will it move before you shoot?"
        ),
        answer: f64::from(speed * breaths),
        hint: format!("{speed} × {breaths} (the starting distance is extra information!)"),
    }
}

fn arrow_batches(rng: &mut dyn RngCore) -> Generated {
    const STICKS: u32 = 3;
    const FLINT: u32 = 5;
    const FEATHERS: u32 = 10;
    let batches = int(rng, 2, 4);
    let (item, per_batch) = pick(
        rng,
        &[("sticks", STICKS), ("flint chips", FLINT), ("feathers", FEATHERS)],
    );
    let arrow_count = batches * 5;
    Generated {
        text: format!(
            "You want to craft {arrow_count} arrows. Each batch of 5 arrows needs {STICKS} sticks, {FLINT} flint, and {FEATHERS} feathers. How many {item} do you need total?"
        ),
        answer: f64::from(batches * per_batch),
        hint: format!(
            "{arrow_count} arrows ÷ 5 per batch = {batches} batches. {batches} × {per_batch}"
        ),
    }
}

fn pelt_trade(rng: &mut dyn RngCore) -> Generated {
    let pelts: u32 = pick(rng, &[5, 10, 15, 20]);
    let rate: u32 = pick(rng, &[2, 3, 5]);
    Generated {
        text: format!(
            "At the trading post, every {rate} rabbit pelts gets you 1 flint chip. You have {pelts} pelts. How many flint chips can you get?"
        ),
        answer: f64::from(pelts) / f64::from(rate),
        hint: format!("{pelts} ÷ {rate}"),
    }
}

fn track_gaps(rng: &mut dyn RngCore) -> Generated {
    let tracks = int(rng, 8, 20);
    let spacing: u32 = pick(rng, &[2, 3, 4]);
    let gaps = tracks - 1;
    Generated {
        text: format!(
            "You count {tracks} deer tracks. Each track is {spacing} feet apart. How far did the deer travel?"
        ),
        answer: f64::from(gaps * spacing),
        hint: format!(
            "The distance is between tracks, so {tracks} tracks = {gaps} gaps. {gaps} × {spacing}"
        ),
    }
}

fn fraction_of_arrows(rng: &mut dyn RngCore) -> Generated {
    // Redraw until the fraction is proper and the share comes out whole.
    let (total, numerator, denominator) = loop {
        let total: u32 = pick(rng, &[18, 24, 30, 36]);
        let numerator: u32 = pick(rng, &[2, 3]);
        let denominator: u32 = pick(rng, &[3, 4]);
        if numerator < denominator && (total * numerator) % denominator == 0 {
            break (total, numerator, denominator);
        }
    };
    Generated {
        text: format!(
            "You started the day with {total} arrows. By sundown you've used {numerator}/{denominator} of them. How many arrows did you use?"
        ),
        answer: f64::from(total * numerator / denominator),
        hint: format!(
            "{total} × {numerator}/{denominator} = {total} × {numerator} ÷ {denominator}"
        ),
    }
}

fn arrowhead_trade(rng: &mut dyn RngCore) -> Generated {
    let pelts: u32 = pick(rng, &[5, 8, 10]);
    let arrowheads: u32 = pick(rng, &[2, 3, 4]);
    let trades = int(rng, 2, 4);
    let player_pelts = pelts * trades;
    Generated {
        text: format!(
            "The trader offers {arrowheads} arrowheads for every {pelts} pelts. You have {player_pelts} pelts. How many arrowheads can you get?"
        ),
        answer: f64::from(trades * arrowheads),
        hint: format!(
            "{player_pelts} ÷ {pelts} = {trades} trades. {trades} × {arrowheads}"
        ),
    }
}

fn cord_reserve(rng: &mut dyn RngCore) -> Generated {
    let total: u32 = pick(rng, &[20, 25, 40, 50]);
    let percent: u32 = pick(rng, &[10, 20, 25, 50]);
    let reserve = f64::from(total * percent) / 100.0;
    Generated {
        text: format!(
            "You have {total} feet of cord. You need to save {percent}% for emergency repairs. How many feet can you use for traps?"
        ),
        answer: f64::from(total) - reserve,
        hint: format!("{percent}% of {total} = {reserve}. Then {total} − {reserve}"),
    }
}

fn camp_rations(rng: &mut dyn RngCore) -> Generated {
    let per_day: u32 = pick(rng, &[3, 4, 5]);
    let people = int(rng, 3, 6);
    let days: u32 = pick(rng, &[5, 7, 10]);
    let daily = per_day * people;
    Generated {
        text: format!(
            "Your camp has {people} people. Each person eats {per_day} pieces of meat per day. How much meat do you need for {days} days?"
        ),
        answer: f64::from(daily * days),
        hint: format!("{per_day} × {people} = {daily} per day. Then × {days} days"),
    }
}

fn wind_drift(rng: &mut dyn RngCore) -> Generated {
    let distance: u32 = pick(rng, &[30, 45, 60, 90]);
    let wind_per_ten: u32 = pick(rng, &[2, 3, 4]);
    let tens = f64::from(distance) / 10.0;
    Generated {
        text: format!(
            "Wind pushes your arrow {wind_per_ten} paces left for every 10 paces of distance. The target is {distance} paces away. How far left should you aim?"
        ),
        answer: tens * f64::from(wind_per_ten),
        hint: format!("{distance} ÷ 10 = {tens}. Then {tens} × {wind_per_ten}"),
    }
}

fn pemmican_ratio(rng: &mut dyn RngCore) -> Generated {
    let cups: u32 = pick(rng, &[2, 3, 4]);
    let servings = cups * pick::<u32>(rng, &[3, 4, 5]);
    let multiplier = int(rng, 2, 3);
    let needed = servings * multiplier;
    Generated {
        text: format!(
            "A pemmican recipe uses {cups} cups of dried meat and makes {servings} servings. You need {needed} servings. How many cups of dried meat do you need?"
        ),
        answer: f64::from(cups * multiplier),
        hint: format!("{needed} ÷ {servings} = {multiplier}. Then {cups} × {multiplier}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn questions_never_exceed_requested_tier() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        for tier in 1..=3 {
            let tier = DifficultyTier::new(tier);
            for _ in 0..200 {
                let q = generate_question(tier, MathTopic::All, &mut rng);
                assert!(q.tier <= tier);
                assert!(q.answer.is_finite());
                assert!(!q.text.is_empty());
                assert!(!q.hint.is_empty());
            }
        }
    }

    #[test]
    fn topic_filter_restricts_when_available() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        for _ in 0..100 {
            let q = generate_question(DifficultyTier::HIGHEST, MathTopic::Percentages, &mut rng);
            assert_eq!(q.topic, MathTopic::Percentages);
        }
    }

    #[test]
    fn topic_filter_falls_back_when_tier_has_none() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let mut seen_other = false;
        for _ in 0..100 {
            let q = generate_question(DifficultyTier::LOWEST, MathTopic::Percentages, &mut rng);
            assert_eq!(q.tier, DifficultyTier::LOWEST);
            seen_other |= q.topic != MathTopic::Percentages;
        }
        assert!(seen_other);
    }

    #[test]
    fn tier_three_fraction_answers_are_whole() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        for _ in 0..100 {
            let generated = fraction_of_arrows(&mut rng);
            assert!((generated.answer - generated.answer.round()).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn answer_matching_uses_epsilon_and_rejects_garbage() {
        assert!(answers_match("6.67", 100.0 / 15.0));
        assert!(answers_match(" 12 ", 12.0));
        assert!(!answers_match("12.5", 12.0));
        assert!(!answers_match("twelve", 12.0));
        assert!(!answers_match("", 0.0));
        assert!(!answers_match("NaN", f64::NAN));
    }

    #[test]
    fn leading_number_is_read_from_wordy_input() {
        assert!(answers_match("12 arrows", 12.0));
        assert!(answers_match("  7.5kg", 7.5));
        assert!(answers_match("-3 left", -3.0));
        assert!(answers_match(".5", 0.5));
        assert!(answers_match("5.", 5.0));
        assert!(answers_match("2e2 birds", 200.0));
        assert!(answers_match("4e", 4.0));
        assert_eq!(parse_answer("arrows 12"), None);
        assert_eq!(parse_answer("-."), None);
        assert_eq!(parse_answer("+"), None);
        assert_eq!(parse_answer("1e999"), None);
    }

    #[test]
    fn topics_parse_from_their_labels() {
        for topic in MathTopic::ALL {
            assert_eq!(topic.as_str().parse::<MathTopic>().unwrap(), topic);
        }
        assert!(matches!(
            "geometry".parse::<MathTopic>(),
            Err(EngineError::InvalidTopic(_))
        ));
    }
}
