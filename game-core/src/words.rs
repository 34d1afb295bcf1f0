use crate::randomizer::Randomizer;

/// Fixed word catalog: ten categories of ten lowercase words each.
/// Drawing picks a category uniformly, then a word uniformly within it.
pub const WORD_CATALOG: &[(&str, &[&str])] = &[
    (
        "Animals",
        &[
            "elephant",
            "dolphin",
            "penguin",
            "kangaroo",
            "octopus",
            "giraffe",
            "crocodile",
            "butterfly",
            "flamingo",
            "chameleon",
        ],
    ),
    (
        "Food",
        &[
            "pizza",
            "sushi",
            "burger",
            "taco",
            "pasta",
            "chocolate",
            "sandwich",
            "pancake",
            "popcorn",
            "lasagna",
        ],
    ),
    (
        "Technology",
        &[
            "smartphone",
            "laptop",
            "robot",
            "satellite",
            "drone",
            "keyboard",
            "headphones",
            "camera",
            "microchip",
            "hologram",
        ],
    ),
    (
        "Places",
        &[
            "beach",
            "mountain",
            "desert",
            "forest",
            "island",
            "volcano",
            "waterfall",
            "canyon",
            "glacier",
            "jungle",
        ],
    ),
    (
        "Sports",
        &[
            "basketball",
            "tennis",
            "swimming",
            "skiing",
            "boxing",
            "surfing",
            "archery",
            "hockey",
            "gymnastics",
            "wrestling",
        ],
    ),
    (
        "Jobs",
        &[
            "doctor",
            "firefighter",
            "astronaut",
            "detective",
            "chef",
            "pilot",
            "architect",
            "scientist",
            "photographer",
            "mechanic",
        ],
    ),
    (
        "Music",
        &[
            "guitar",
            "piano",
            "drums",
            "violin",
            "saxophone",
            "trumpet",
            "concert",
            "orchestra",
            "karaoke",
            "headphones",
        ],
    ),
    (
        "Movies",
        &[
            "superhero",
            "zombie",
            "vampire",
            "pirate",
            "wizard",
            "dinosaur",
            "alien",
            "cowboy",
            "samurai",
            "gladiator",
        ],
    ),
    (
        "Objects",
        &[
            "umbrella",
            "telescope",
            "microscope",
            "compass",
            "lantern",
            "hourglass",
            "binoculars",
            "kaleidoscope",
            "pendulum",
            "anchor",
        ],
    ),
    (
        "Nature",
        &[
            "rainbow",
            "lightning",
            "tornado",
            "earthquake",
            "avalanche",
            "tsunami",
            "eclipse",
            "aurora",
            "comet",
            "meteor",
        ],
    ),
];

/// A drawn secret word with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct WordDraw {
    pub word: &'static str,
    pub category: &'static str,
}

/// Draw a `(secretWord, category)` pair from the catalog.
pub fn draw_word(rng: &mut Randomizer) -> WordDraw {
    // The catalog is a non-empty constant, so both picks always succeed.
    let &(category, words) = rng.pick(WORD_CATALOG).unwrap_or(&WORD_CATALOG[0]);
    let word = *rng.pick(words).unwrap_or(&words[0]);
    WordDraw { word, category }
}

/// The word list for a category, if the category exists.
pub fn category_words(category: &str) -> Option<&'static [&'static str]> {
    WORD_CATALOG
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, words)| *words)
}
