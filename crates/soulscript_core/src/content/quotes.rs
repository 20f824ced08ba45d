//! Daily inspiration quotes.

use chrono::{Datelike, NaiveDate};

/// One quote with attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: &[Quote] = &[
    Quote {
        text: "The pessimist sees difficulty in every opportunity. The optimist sees opportunity in every difficulty.",
        author: "Winston Churchill",
    },
    Quote {
        text: "Don't let yesterday take up too much of today.",
        author: "Will Rogers",
    },
    Quote {
        text: "You learn more from failure than from success. Don’t let it stop you. Failure builds character.",
        author: "Unknown",
    },
    Quote {
        text: "The best way to get started is to quit talking and begin doing.",
        author: "Walt Disney",
    },
    Quote {
        text: "It’s not whether you get knocked down, it’s whether you get up.",
        author: "Vince Lombardi",
    },
    Quote {
        text: "If you are working on something that you really care about, you don’t have to be pushed. The vision pulls you.",
        author: "Steve Jobs",
    },
    Quote {
        text: "People who are crazy enough to think they can change the world, are the ones who do.",
        author: "Rob Siltanen",
    },
    Quote {
        text: "Failure will never overtake me if my determination to succeed is strong enough.",
        author: "Og Mandino",
    },
    Quote {
        text: "We may encounter many defeats but we must not be defeated.",
        author: "Maya Angelou",
    },
    Quote {
        text: "Knowing is not enough; we must apply. Wishing is not enough; we must do.",
        author: "Johann Wolfgang von Goethe",
    },
    Quote {
        text: "Imagine your life is perfect in every respect; what would it look like?",
        author: "Brian Tracy",
    },
    Quote {
        text: "We generate fears while we sit. We overcome them by action.",
        author: "Dr. Henry Link",
    },
    Quote {
        text: "Whether you think you can or think you can’t, you’re right.",
        author: "Henry Ford",
    },
    Quote {
        text: "The only limit to our realization of tomorrow will be our doubts of today.",
        author: "Franklin D. Roosevelt",
    },
    Quote {
        text: "Creativity is intelligence having fun.",
        author: "Albert Einstein",
    },
    Quote {
        text: "What you lack in talent can be made up with desire, hustle and giving 110% all the time.",
        author: "Don Zimmer",
    },
    Quote {
        text: "Do what you can with all you have, wherever you are.",
        author: "Theodore Roosevelt",
    },
    Quote {
        text: "The future belongs to the competent. Get good, get better, be the best!",
        author: "Brian Tracy",
    },
    Quote {
        text: "For every reason it’s not possible, there are hundreds of people who have faced the same circumstances and succeeded.",
        author: "Jack Canfield",
    },
    Quote {
        text: "Things work out best for those who make the best of how things work out.",
        author: "John Wooden",
    },
    Quote {
        text: "A goal is a dream with a deadline.",
        author: "Napoleon Hill",
    },
    Quote {
        text: "The secret of getting ahead is getting started.",
        author: "Mark Twain",
    },
    Quote {
        text: "I’ve missed more than 9,000 shots in my career. I’ve lost almost 300 games. 26 times I’ve been trusted to take the game winning shot and missed. I’ve failed over and over and over again in my life and that is why I succeed.",
        author: "Michael Jordan",
    },
    Quote {
        text: "Don’t limit yourself. Many people limit themselves to what they think they can do. You can go as far as your mind lets you. What you believe, remember, you can achieve.",
        author: "Mary Kay Ash",
    },
    Quote {
        text: "The best time to plant a tree was 20 years ago. The second best time is now.",
        author: "Chinese Proverb",
    },
    Quote {
        text: "Only the paranoid survive.",
        author: "Andy Grove",
    },
    Quote {
        text: "It’s hard to beat a person who never gives up.",
        author: "Babe Ruth",
    },
    Quote {
        text: "If you want to live a happy life, tie it to a goal, not to people or things.",
        author: "Albert Einstein",
    },
    Quote {
        text: "Your time is limited, so don’t waste it living someone else’s life.",
        author: "Steve Jobs",
    },
    Quote {
        text: "The whole secret of a successful life is to find out what is one’s destiny to do, and then do it.",
        author: "Henry Ford",
    },
];

/// Quote shown on `date`: rotates through the list by 1-based day of year.
pub fn quote_of_the_day(date: NaiveDate) -> Quote {
    QUOTES[date.ordinal() as usize % QUOTES.len()]
}

#[cfg(test)]
mod tests {
    use super::{quote_of_the_day, QUOTES};
    use chrono::NaiveDate;

    #[test]
    fn quote_rotates_by_day_of_year() {
        let jan_1 = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        let jan_2 = NaiveDate::from_ymd_opt(2024, 1, 2).expect("date");
        assert_eq!(quote_of_the_day(jan_1), QUOTES[1]);
        assert_eq!(quote_of_the_day(jan_2), QUOTES[2]);
        assert_ne!(quote_of_the_day(jan_1), quote_of_the_day(jan_2));
    }

    #[test]
    fn every_quote_has_text_and_author() {
        assert!(QUOTES
            .iter()
            .all(|quote| !quote.text.is_empty() && !quote.author.is_empty()));
    }
}
