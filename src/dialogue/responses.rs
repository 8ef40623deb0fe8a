//! Canned replies. Templates carry a `{}` slot filled by [`fill`].

use rand::{seq::SliceRandom, Rng};

pub const GREETINGS: &[&str] = &[
    "Tell me about movies you loved or couldn't stand, and I'll find you something new to watch.",
    "What have you watched lately? Tell me what you thought of it.",
];

pub const FAREWELLS: &[&str] = &[
    "Thanks for the chat. Enjoy your next movie!",
    "Hope you found something good to watch. Bye!",
    "Come back any time you need another recommendation. Goodbye!",
];

pub const LIKED: &[&str] = &[
    "You liked {}, noted!",
    "Ok, so {} worked for you.",
    "{}? Good pick.",
    "Glad to hear you enjoyed {}.",
];

pub const LOVED: &[&str] = &[
    "Sounds like {} is a real favorite of yours!",
    "Wow, you really loved {}. Noted!",
];

pub const DISLIKED: &[&str] = &[
    "Got it, {} wasn't for you.",
    "So {} was a miss. Noted.",
    "Fair enough, you didn't like {}.",
];

pub const HATED: &[&str] = &[
    "Ouch, you really didn't like {}.",
    "Noted: {} is firmly off your list.",
];

pub const NEUTRAL: &[&str] = &[
    "I can't tell whether you liked {}. Could you tell me a bit more? You can also just say no.",
    "Hmm, I'm not sure how you felt about {}. Did you like it? Saying no skips it.",
];

pub const UNKNOWN_MOVIE: &[&str] = &[
    "Hmm, I don't think I know that movie. Could you try another one?",
    "That title doesn't ring a bell. Tell me about a different movie?",
];

pub const NO_TITLE: &str =
    "I didn't catch a movie there. Could you tell me about one movie, with its title in double quotes?";

pub const NEED_MORE_RATINGS: &str =
    "I need at least {} rated movies before I can recommend anything. What else have you watched?";

pub const SPELL_CONFIRM: &[&str] = &[
    "I couldn't find a movie called \"{title}\". Did you mean {candidate}?",
    "\"{title}\" isn't in my list. Were you thinking of {candidate}?",
];

pub const SPELL_DECLINED: &str =
    "Ok, you weren't talking about {} then. Check the spelling and tell me again, or pick another movie.";

pub const SPELL_REASK: &str = "Sorry, was that a yes or a no? {}";

pub const CLARIFY_ASK: &str =
    "Can you tell me which one you mean? It's fine to say no if you'd rather skip it.";

pub const SPECIFY_ASK: &str = "Please tell me again with a more specific title.";

pub const CLARIFY_STILL_AMBIGUOUS: &str =
    "Thanks! I still can't choose between {}. Which one was it? You can also say no.";

pub const CLARIFY_CANCELLED: &str = "Alright, let's forget that one. Tell me about another movie.";

pub const FOLLOWUP_CANCELLED: &str = "No problem, let's move on. What else have you seen?";

pub const RECOMMEND_FIRST: &str = "Here's a movie I think you'll like: {}.";

pub const RECOMMEND_NEXT: &str = "How about {}?";

pub const RECOMMEND_MORE: &str = "Would you like another recommendation? (yes or no)";

pub const RECOMMEND_EXHAUSTED: &str =
    "That's all {} recommendations I had. Tell me about more movies and ask again for fresh ones.";

pub const RECOMMEND_NONE: &str =
    "I've run out of movies to suggest. You seem to have rated everything I know!";

pub const RECOMMEND_STOPPED: &str =
    "Ok, moving on. Keep telling me about movies so my suggestions get better.";

pub const RECOMMEND_REASK: &str = "Hmm, is that a yes or a no?";

pub const UNLOCKED: &str =
    "I now know enough to recommend movies. Keep rating, or ask me for a recommendation whenever you like.";

/// Picks one template from a bank
pub fn pick<R: Rng + ?Sized>(rng: &mut R, bank: &[&'static str]) -> &'static str {
    bank.choose(rng).copied().unwrap_or_default()
}

/// Fills the first `{}` slot of a template
pub fn fill(template: &str, value: impl std::fmt::Display) -> String {
    template.replacen("{}", &value.to_string(), 1)
}

/// Wraps a title in double quotes for display
pub fn quoted(title: &str) -> String {
    format!("\"{}\"", title)
}

/// Joins items with commas and a final conjunction: "a, b, and c".
pub fn join_titles<S: AsRef<str>>(items: &[S], conjunction: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} {} {}", first.as_ref(), conjunction, second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{}, {} {}", head.join(", "), conjunction, last.as_ref())
        }
    }
}
