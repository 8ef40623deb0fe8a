//! Small-talk replies for lines that mention no movie.

use rand::Rng;

use super::responses::pick;

const QUESTION_WORDS: &[&str] = &["who", "what", "when", "where", "why", "how"];

const YES_NO_OPENERS: &[&str] = &["did", "do", "can", "may", "will"];

const TO_BE: &[&str] = &["is", "are", "was", "were"];

const ACKNOWLEDGEMENTS: &[&str] = &[
    "I see.",
    "Interesting.",
    "Huh.",
    "Okay.",
    "Good to know.",
    "Really?",
    "Got it.",
];

/// Swaps first and second person so an echoed question reads naturally
fn swap_person(word: &str) -> &str {
    match word.to_lowercase().as_str() {
        "i" | "me" => "you",
        "my" => "your",
        "myself" => "yourself",
        "you" => "me",
        "your" => "my",
        "yourself" => "myself",
        _ => word,
    }
}

fn swapped(words: &[&str]) -> String {
    words.iter().map(|w| swap_person(w)).collect::<Vec<_>>().join(" ")
}

fn is_multi_sentence(line: &str) -> bool {
    [". ", "! ", "? "].iter().any(|sep| line.contains(sep))
}

/// Answers a line that contained no movie title.
pub fn respond<R: Rng + ?Sized>(line: &str, rng: &mut R, bot_name: &str) -> String {
    let line = line.trim();
    if line.is_empty() {
        return "Looks like you pressed enter without typing anything :)".to_string();
    }
    if is_multi_sentence(line) {
        return "Whoa, slow down! I can only follow one sentence at a time.".to_string();
    }

    let line = line.strip_suffix(&['.', '!', '?', ',', ';'][..]).unwrap_or(line);
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let first = tokens
        .first()
        .map(|t| t.trim_end_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .unwrap_or_default();
    let opens_question =
        QUESTION_WORDS.contains(&first.as_str()) || YES_NO_OPENERS.contains(&first.as_str());

    let mut catch_all = || {
        format!(
            "{} But let's get back to movies. I'm {} after all!",
            pick(rng, ACKNOWLEDGEMENTS),
            bot_name
        )
    };

    match tokens.as_slice() {
        [_] if opens_question => format!("I don't know - {}?", first),
        [_, second] if opens_question => {
            format!("I don't know - {} {}?", first, swap_person(&second.to_lowercase()))
        }
        [] | [_] | [_, _] => catch_all(),
        [_, second, rest @ ..] => {
            let second = second.to_lowercase();
            match (first.as_str(), second.as_str()) {
                (q, verb) if QUESTION_WORDS.contains(&q) && TO_BE.contains(&verb) => {
                    format!("I don't know {} {} {}.", q, swapped(rest), verb)
                }
                ("can", "you") => format!("Sorry, I probably can't {}.", swapped(rest)),
                ("did", "you") => format!("I'm not sure, but I probably didn't {}.", swapped(rest)),
                ("do", "you") => format!("Sorry, I probably don't {}.", swapped(rest)),
                ("will", "you") => format!("I'm not sure, but I probably won't {}.", swapped(rest)),
                _ if opens_question => format!(
                    "I don't know, {} {} {}? The world is full of mysteries...",
                    first,
                    tokens[1],
                    rest.join(" ")
                ),
                _ if line.to_lowercase().contains("thank") => "You're welcome!".to_string(),
                _ => catch_all(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn reply(line: &str) -> String {
        respond(line, &mut StdRng::seed_from_u64(1), "Moviebot")
    }

    #[test]
    fn test_empty_line() {
        assert!(reply("   ").contains("pressed enter"));
    }

    #[test]
    fn test_several_sentences() {
        assert!(reply("Hi there. How are you?").contains("one sentence"));
    }

    #[test]
    fn test_to_be_question_is_echoed() {
        assert_eq!(reply("Where is my car?"), "I don't know where your car is.");
        assert_eq!(reply("What are you"), "I don't know what me are.");
    }

    #[test]
    fn test_hedged_refusals_swap_person() {
        assert_eq!(reply("Can you help me?"), "Sorry, I probably can't help you.");
        assert_eq!(reply("Did you see my keys?"), "I'm not sure, but I probably didn't see your keys.");
        assert_eq!(reply("Do you like me"), "Sorry, I probably don't like you.");
        assert_eq!(reply("Will you marry me?"), "I'm not sure, but I probably won't marry you.");
    }

    #[test]
    fn test_short_questions() {
        assert_eq!(reply("Why?"), "I don't know - why?");
        assert_eq!(reply("Why me?"), "I don't know - why you?");
        assert_eq!(reply("Who, me?"), "I don't know - who you?");
    }

    #[test]
    fn test_other_questions_are_mysteries() {
        assert_eq!(
            reply("How come the sky turns red?"),
            "I don't know, how come the sky turns red? The world is full of mysteries..."
        );
    }

    #[test]
    fn test_thanks() {
        assert_eq!(reply("Thank you so much"), "You're welcome!");
    }

    #[test]
    fn test_catch_all_steers_back_to_movies() {
        let answer = reply("I am hungry today");
        assert!(answer.contains("back to movies"));
        assert!(answer.contains("Moviebot"));
        assert!(reply("Hello").contains("back to movies"));
    }
}
