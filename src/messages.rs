//! Texts sent to the chat. Everything is Telegram HTML; user input is escaped.

use teloxide::utils::html::escape;

use crate::quiz::stats::Stats;
use crate::quiz::{Category, Subject, Tense, Verdict, VerbEntry};
use crate::session::Session;

pub const GREETING: &str = "¡Hola! I am ConjugatePro. I will give you a Spanish verb and a subject, \
and you type the conjugated form. Accents count!\n\nWhich tense do you want to practice?";

pub const CHOOSE_TENSE: &str = "Which tense do you want to practice?";
pub const CHOOSE_CATEGORY: &str = "Which verbs do you want to practice?";
pub const CHOOSE_OPTION: &str = "Please choose one of the options on the keyboard";
pub const TEXT_ONLY: &str = "Please type your answer as text";
pub const PRESS_NEXT: &str = "Press \"Next verb\" to continue";
pub const STATS_RESET: &str = "Statistics reset.";

pub fn no_verbs(category: Category) -> String {
    format!(
        "There are no verbs in \"{}\" right now. Please choose another category.",
        category
    )
}

pub fn round_prompt(session: &Session) -> String {
    format!(
        "<i>{} practice</i> · round {}\n\n<b>{}</b>\n<i>(translation hidden)</i>\n\n<b>{}</b> → ?",
        session.settings.tense,
        session.round_number,
        escape(&session.round.verb.infinitive),
        session.round.subject,
    )
}

pub fn verdict(verdict: &Verdict, verb: &VerbEntry, stats: &Stats) -> String {
    let headline = if verdict.is_correct {
        format!("✅ <b>Correct!</b>\nWell done: <b>{}</b>", escape(&verdict.correct_answer))
    } else if verdict.is_accent_error {
        format!(
            "❌ <b>Accent Error</b>\nAccurate accents are required!\nYou wrote <s>{}</s>, correct spelling: <b><u>{}</u></b>",
            escape(verdict.user_answer.trim()),
            escape(&verdict.correct_answer)
        )
    } else {
        format!(
            "❌ <b>Incorrect</b>\nCorrect spelling: <b><u>{}</u></b>",
            escape(&verdict.correct_answer)
        )
    };

    format!(
        "{}\n\n<b>{}</b> means <i>{}</i>\n\n{}",
        headline,
        escape(&verb.infinitive),
        escape(&verb.meaning),
        stats_line(stats)
    )
}

pub fn stats_line(stats: &Stats) -> String {
    format!(
        "Correct: {} · Incorrect: {} · Accuracy: {}%",
        stats.correct,
        stats.incorrect,
        stats.accuracy_percent()
    )
}

pub fn conjugation_chart(verb: &VerbEntry, tense: Tense, current: Subject) -> String {
    let rows = Subject::ALL
        .iter()
        .map(|subject| {
            let form = escape(verb.conjugation(tense, *subject));
            if *subject == current {
                format!("👉 <b>{}: {}</b>", subject, form)
            } else {
                format!("{}: {}", subject, form)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("📖 <b>{}</b> ({})\n\n{}", escape(&verb.infinitive), tense, rows)
}

pub fn example(sentence: &str) -> String {
    format!("💡 <i>“{}”</i>", escape(sentence))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::quiz::answer::compare;
    use crate::quiz::fixtures::verb;
    use crate::session::{Progress, Settings};

    #[test]
    fn prompt_hides_the_meaning() {
        let verbs = vec![verb("hablar", Category::Regular)];
        let settings = Settings {
            tense: Tense::Preterite,
            category: Category::Regular,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let session = Session::start(&verbs, settings, Progress::default(), &mut rng).unwrap();

        let prompt = round_prompt(&session);
        assert!(prompt.contains("<b>hablar</b>"));
        assert!(prompt.contains("Preterite practice"));
        assert!(prompt.contains(session.round.subject.label()));
        assert!(!prompt.contains("to hablar"));
    }

    #[test]
    fn accent_error_is_called_out() {
        let hablar = verb("hablar", Category::Regular);
        let verdict_ = compare("hable", "hablé");
        let mut stats = Stats::default();
        stats.record(&verdict_);

        let text = verdict(&verdict_, &hablar, &stats);
        assert!(text.contains("Accent Error"));
        assert!(text.contains("Accurate accents are required!"));
        assert!(text.contains("<u>hablé</u>"));
        assert!(text.contains("<i>to hablar</i>"));
        assert!(text.contains("Accuracy: 0%"));
    }

    #[test]
    fn mismatch_and_correct_headlines() {
        let hablar = verb("hablar", Category::Regular);
        let stats = Stats::default();
        assert!(verdict(&compare("como", "hablo"), &hablar, &stats).contains("Incorrect"));
        assert!(verdict(&compare("hablo", "hablo"), &hablar, &stats).contains("Correct!"));
    }

    #[test]
    fn user_input_is_escaped() {
        let hablar = verb("hablar", Category::Regular);
        let text = verdict(&compare("<B>hablo", "<b>hablo"), &hablar, &Stats::default());
        assert!(text.contains("&lt;B&gt;hablo"));
        assert!(!text.contains("<B>"));
    }

    #[test]
    fn chart_lists_every_subject_and_highlights_current() {
        let hablar = verb("hablar", Category::Regular);
        let chart = conjugation_chart(&hablar, Tense::Present, Subject::Nosotros);
        for subject in Subject::ALL {
            assert!(chart.contains(subject.label()));
        }
        assert!(chart.contains("👉 <b>Nosotros: hablamos</b>"));
        assert!(chart.contains("Yo: hablo"));
    }

    #[test]
    fn stats_line_shows_accuracy() {
        let stats = Stats {
            correct: 3,
            incorrect: 1,
            total: 4,
        };
        assert_eq!(
            stats_line(&stats),
            "Correct: 3 · Incorrect: 1 · Accuracy: 75%"
        );
    }
}
