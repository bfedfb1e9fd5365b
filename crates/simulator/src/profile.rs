//! Throwaway users and vehicles for a simulation run.

use chrono::Datelike;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use model::{user::User, vehicle::Vehicle};

pub const DEFAULT_PASSWORD: &str = "hunter2";
pub const SURNAME: &str = "McTestface";

const FIRST_VINTAGE: u16 = 1970;

const ADJECTIVES: &[&str] = &[
    "amber", "brisk", "calm", "dusty", "eager", "fuzzy", "gentle", "hollow", "icy", "jolly",
    "lucky", "misty", "noisy", "quiet", "rapid", "sunny", "tidy", "vivid", "wild", "young",
];

const NOUNS: &[&str] = &[
    "badger", "comet", "dingo", "falcon", "gecko", "heron", "koala", "lynx", "marten", "otter",
    "panda", "quail", "raven", "salmon", "tapir", "urchin", "walrus", "yak", "zebra", "ferret",
];

const GIVEN_NAMES: &[&str] = &[
    "Alice", "Benjamin", "Charlotte", "Daniel", "Emma", "Frederik", "Grace", "Henry", "Ida",
    "Jonas", "Karen", "Lucas", "Maria", "Noah", "Olivia", "Peter", "Sofie", "Thomas",
];

const COMPANIES: &[&str] = &[
    "Hansen Group",
    "Miller and Sons",
    "Nielsen Ltd",
    "Baker-Jensen",
    "Anderson Inc",
    "Larsen PLC",
    "Carter, Moss and Reid",
    "Kristensen Motors",
    "Walsh LLC",
    "Olsen-Pedersen",
];

const WORDS: &[&str] = &[
    "apex", "breeze", "cinder", "delta", "ember", "fable", "glide", "harbor", "ignite",
    "journey", "kestrel", "lumen", "meadow", "nimbus", "orbit", "pulse", "quest", "ridge",
    "summit", "tundra",
];

/// Generates users and vehicles from a random number generator. Seed it to
/// get reproducible profiles.
pub struct ProfileGenerator<R: Rng> {
    rng: R,
    password: String,
}

impl ProfileGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), DEFAULT_PASSWORD)
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy(), DEFAULT_PASSWORD)
    }
}

impl<R: Rng> ProfileGenerator<R> {
    pub fn new<P: Into<String>>(rng: R, password: P) -> Self {
        Self {
            rng,
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn user(&mut self) -> User {
        let username = format!(
            "{}_{}{}",
            self.pick(ADJECTIVES),
            self.pick(NOUNS),
            self.rng.gen_range(10..1000)
        );
        User {
            username,
            givenname: Some(self.pick(GIVEN_NAMES).to_owned()),
            surname: Some(SURNAME.to_owned()),
            password: Some(self.password.clone()),
        }
    }

    pub fn vehicle(&mut self) -> Vehicle {
        let current_year = chrono::Utc::now().year().clamp(FIRST_VINTAGE as i32, u16::MAX as i32) as u16;
        Vehicle {
            make: self.pick(COMPANIES).to_owned(),
            model: capitalize(self.pick(WORDS)),
            vintage: self.rng.gen_range(FIRST_VINTAGE..=current_year),
            vin: self.ean13(),
        }
    }

    fn ean13(&mut self) -> String {
        let mut digits: String = (0..12)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect();
        digits.push(char::from(b'0' + check_digit(&digits)));
        digits
    }

    fn pick(&mut self, words: &'static [&'static str]) -> &'static str {
        words.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// EAN-13 check digit for the first twelve digits. Non-digits are ignored.
pub fn check_digit(digits: &str) -> u8 {
    let sum: u32 = digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d } else { d * 3 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// True for a 13 digit number with a matching check digit.
pub fn is_valid_ean13(vin: &str) -> bool {
    vin.len() == 13
        && vin.chars().all(|c| c.is_ascii_digit())
        && vin[12..].parse::<u8>().ok() == Some(check_digit(&vin[..12]))
}
