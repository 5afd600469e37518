use rand::prelude::*;

pub const JOKES: [&str; 5] = [
    "Why don’t scientists trust atoms? Because they make up everything!",
    "Why did the computer go to therapy? It had too many bytes of emotional baggage.",
    "Why did the scarecrow win an award? Because he was outstanding in his field!",
    "I told my computer I needed a break, and now it won’t stop sending me KitKat ads.",
    "Why was the math book sad? Because it had too many problems.",
];

/// Uniform pick, independent of any earlier pick.
pub fn random_joke() -> &'static str {
    let mut rng = rand::rng();
    JOKES.choose(&mut rng).copied().unwrap_or(JOKES[0])
}
