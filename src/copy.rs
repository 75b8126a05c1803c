// User-facing text. Kept apart from the logic so the copy can change freely.

pub const BUTTON_INITIAL: &str = "No 🙃";
pub const BUTTON_TERMINAL: &str = "Fine... click if you must 😭";

/// Label prefixes for the five graduated tiers, most confident first.
pub const BUTTON_TIERS: [&str; 5] = [
    "No? 🤔",
    "Still No? 😅",
    "Really? 😢",
    "Come on... 🥺",
    "Almost there! 💔",
];

pub const DISCOURAGEMENTS: &[&str] = &[
    "The button is just playing hard to get! 💚",
    "Like Shrek, this button has layers! 🧅",
    "Donkey wouldn't give up, neither should you! 🫏",
    "This is more persistent than Donkey! 😄",
    "The swamp is calling... say YES! 🌿",
    "Even Fiona said yes eventually! 👸",
    "Ogres are like onions... and so is this button! 🧅",
    "Come on, you know you want to say YES! 💕",
    "This button has more moves than Puss in Boots! 🐱",
    "Lord Farquaad tried less hard than you! 🤴",
];

pub const SUMMARY_EMPTY: &str = "You haven't made any selections yet! 😊";

pub const COUNTDOWN_DONE: &str = "It's Valentine's Day! 💕";

pub const MUSIC_ON: &str = "🔊";
pub const MUSIC_OFF: &str = "🔇";

pub const HEART_GLYPHS: [&str; 2] = ["💚", "💖"];

pub const BANNER: [(&str, &str); 3] = [
    (
        "%c💚 Welcome to the Valentine's Adventure! 💚",
        "font-size: 20px; color: #7cb342; font-weight: bold;",
    ),
    (
        "%cMade with love and a little bit of Shrek magic 🐸✨",
        "font-size: 14px; color: #ff85a8; font-style: italic;",
    ),
    (
        "%c🎯 Pro tip: Try clicking \"No\" 35 times... if you dare! 😏",
        "font-size: 12px; color: #7cb342;",
    ),
];
