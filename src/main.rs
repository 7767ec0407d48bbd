mod config;
mod messages;
mod quiz;
mod session;

use std::{fs::File, sync::Arc};

use chatgpt::{client::ChatGPT, config::ChatGPTEngine};
use dotenv::dotenv;
use log::{debug, error, info, warn};
use quiz::{
    ai_helper::QuizHelper, catalog::VerbCatalog, speech::Pronouncer, Category, Subject, Tense,
    Verdict, VerbEntry,
};
use session::{Progress, Session, Settings};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{
        ChatAction, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
        ParseMode,
    },
};

use crate::config::Config;

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveTense {
        progress: Progress,
    },
    ReceiveCategory {
        tense: Tense,
        progress: Progress,
    },
    Answering {
        session: Session,
    },
    Reviewing {
        session: Session,
        verdict: Verdict,
    },
}

type DialogueStorage = std::sync::Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv();
    pretty_env_logger::init();
    if let Err(err) = dotenv_loaded {
        debug!("No .env file loaded: {}", err);
    }

    let config = Config::from_env()?;
    info!("Starting conjugation bot...");

    let bot = Bot::new(config.telegram_token.clone());

    info!("Opening dialogue storage at {}", config.dialogue_db);
    let storage: DialogueStorage = SqliteStorage::open(&config.dialogue_db, Json)
        .await?
        .erase();

    let catalog = match &config.verb_catalog {
        Some(path) => {
            info!("Loading verb catalog from {}", path.display());
            VerbCatalog::new(File::open(path)?)?
        }
        None => VerbCatalog::bundled()?,
    };
    info!(
        "Loaded {} verbs ({} regular, {} irregular)",
        catalog.len(),
        catalog.count_in(Category::Regular),
        catalog.count_in(Category::Irregular)
    );

    let gpt = {
        let mut gpt = ChatGPT::new(config.chatgpt_api_key.clone())?;

        gpt.config.engine = ChatGPTEngine::Gpt35Turbo;
        gpt.config.timeout = config.chatgpt_timeout;

        gpt
    };

    let quiz_helper = Arc::new(QuizHelper::new(gpt));
    let pronouncer = Arc::new(Pronouncer::new(
        config.chatgpt_api_key.clone(),
        config.tts_model.clone(),
        config.tts_voice.clone(),
    )?);
    let catalog = Arc::new(catalog);

    Dispatcher::builder(
        bot,
        dptree::entry()
            .branch(
                Update::filter_message()
                    .enter_dialogue::<Message, ErasedStorage<State>, State>()
                    .branch(dptree::case![State::Start].endpoint(start))
                    .branch(
                        dptree::case![State::ReceiveTense { progress }].endpoint(receive_tense),
                    )
                    .branch(
                        dptree::case![State::ReceiveCategory { tense, progress }]
                            .endpoint(receive_category),
                    )
                    .branch(dptree::case![State::Answering { session }].endpoint(answering))
                    .branch(
                        dptree::case![State::Reviewing { session, verdict }].endpoint(reviewing),
                    ),
            )
            .branch(Update::filter_callback_query().endpoint(listen_to_chart_form)),
    )
    .dependencies(dptree::deps![storage, catalog, quiz_helper, pronouncer])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

const NEXT_VERB: &str = "➡️ Next verb";
const LISTEN: &str = "🔊 Listen";
const CHART: &str = "📖 Conjugation chart";
const SETTINGS: &str = "⚙️ Settings";
const RESET_STATS: &str = "♻️ Reset stats";

// Telegram rejects callback data longer than 64 bytes
const SAY_PREFIX: &str = "say:";

fn tense_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(
        Tense::ALL
            .iter()
            .map(|t| vec![KeyboardButton::new(t.label())])
            .collect::<Vec<_>>(),
    )
}

fn category_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(
        Category::ALL
            .iter()
            .map(|c| vec![KeyboardButton::new(c.label())])
            .collect::<Vec<_>>(),
    )
}

fn answering_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(LISTEN), KeyboardButton::new(CHART)],
        vec![KeyboardButton::new(SETTINGS), KeyboardButton::new(RESET_STATS)],
    ])
}

fn reviewing_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(NEXT_VERB)],
        vec![KeyboardButton::new(LISTEN), KeyboardButton::new(CHART)],
        vec![KeyboardButton::new(SETTINGS), KeyboardButton::new(RESET_STATS)],
    ])
}

/// One button per subject under the chart; pressing it reads that form aloud.
fn chart_keyboard(verb: &VerbEntry, tense: Tense) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        Subject::ALL
            .iter()
            .map(|subject| {
                let form = verb.conjugation(tense, *subject);
                vec![InlineKeyboardButton::callback(
                    format!("🔊 {}: {}", subject, form),
                    format!("{}{}", SAY_PREFIX, form),
                )]
            })
            .collect::<Vec<_>>(),
    )
}

fn form_to_say(data: &str) -> Option<&str> {
    data.strip_prefix(SAY_PREFIX)
        .map(str::trim)
        .filter(|form| !form.is_empty())
}

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    ask_tense(bot, dialogue, msg.chat.id, messages::GREETING, Progress::default()).await
}

async fn ask_tense(
    bot: Bot,
    dialogue: QuizDialogue,
    chat_id: ChatId,
    text: &str,
    progress: Progress,
) -> HandlerResult {
    bot.send_message(chat_id, text)
        .reply_markup(tense_keyboard())
        .await?;
    dialogue.update(State::ReceiveTense { progress }).await?;
    Ok(())
}

async fn receive_tense(
    bot: Bot,
    dialogue: QuizDialogue,
    progress: Progress,
    msg: Message,
) -> HandlerResult {
    let Some(tense) = msg.text().and_then(Tense::from_label) else {
        bot.send_message(msg.chat.id, messages::CHOOSE_OPTION)
            .reply_markup(tense_keyboard())
            .await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, messages::CHOOSE_CATEGORY)
        .reply_markup(category_keyboard())
        .await?;
    dialogue
        .update(State::ReceiveCategory { tense, progress })
        .await?;
    Ok(())
}

async fn receive_category(
    bot: Bot,
    dialogue: QuizDialogue,
    (tense, progress): (Tense, Progress),
    msg: Message,
    catalog: Arc<VerbCatalog>,
) -> HandlerResult {
    let Some(category) = msg.text().and_then(Category::from_label) else {
        bot.send_message(msg.chat.id, messages::CHOOSE_OPTION)
            .reply_markup(category_keyboard())
            .await?;
        return Ok(());
    };

    let settings = Settings { tense, category };
    let started = Session::start(catalog.verbs(), settings, progress, &mut rand::thread_rng());
    let Some(session) = started else {
        warn!("Category {:?} has no verbs", category);
        bot.send_message(msg.chat.id, messages::no_verbs(category))
            .reply_markup(category_keyboard())
            .await?;
        return Ok(());
    };

    show_round(bot, dialogue, msg.chat.id, session).await
}

async fn show_round(
    bot: Bot,
    dialogue: QuizDialogue,
    chat_id: ChatId,
    session: Session,
) -> HandlerResult {
    debug!(
        "Chat {}: round {} is {} / {}",
        chat_id, session.round_number, session.round.verb.infinitive, session.round.subject
    );
    bot.send_message(chat_id, messages::round_prompt(&session))
        .parse_mode(ParseMode::Html)
        .reply_markup(answering_keyboard())
        .await?;
    dialogue.update(State::Answering { session }).await?;
    Ok(())
}

async fn answering(
    bot: Bot,
    dialogue: QuizDialogue,
    session: Session,
    msg: Message,
    quiz_helper: Arc<QuizHelper>,
    pronouncer: Arc<Pronouncer>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, messages::TEXT_ONLY).await?;
        return Ok(());
    };

    match text {
        LISTEN => {
            let infinitive = session.round.verb.infinitive.clone();
            spawn_pronunciation(bot, pronouncer, msg.chat.id, infinitive);
            Ok(())
        }
        CHART => send_chart(bot, msg.chat.id, &session).await,
        SETTINGS => {
            ask_tense(
                bot,
                dialogue,
                msg.chat.id,
                messages::CHOOSE_TENSE,
                session.progress(),
            )
            .await
        }
        RESET_STATS => {
            let mut session = session;
            session.stats.reset();
            bot.send_message(msg.chat.id, messages::STATS_RESET)
                .reply_markup(answering_keyboard())
                .await?;
            dialogue.update(State::Answering { session }).await?;
            Ok(())
        }
        answer => {
            let mut session = session;
            let verdict = session.submit(answer);
            debug!(
                "Chat {}: answered {:?} for {:?} (correct: {}, accent error: {})",
                msg.chat.id,
                verdict.user_answer,
                verdict.correct_answer,
                verdict.is_correct,
                verdict.is_accent_error
            );

            bot.send_message(
                msg.chat.id,
                messages::verdict(&verdict, &session.round.verb, &session.stats),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(reviewing_keyboard())
            .await?;

            dialogue
                .update(State::Reviewing {
                    session: session.clone(),
                    verdict,
                })
                .await?;

            spawn_example(bot, dialogue, quiz_helper, &session);
            Ok(())
        }
    }
}

async fn reviewing(
    bot: Bot,
    dialogue: QuizDialogue,
    (session, verdict): (Session, Verdict),
    msg: Message,
    catalog: Arc<VerbCatalog>,
    pronouncer: Arc<Pronouncer>,
) -> HandlerResult {
    match msg.text() {
        Some(NEXT_VERB) => {
            let next = session.next_round(catalog.verbs(), &mut rand::thread_rng());
            match next {
                Some(next) => show_round(bot, dialogue, msg.chat.id, next).await,
                None => {
                    let category = session.settings.category;
                    warn!("Category {:?} has no verbs", category);
                    bot.send_message(msg.chat.id, messages::no_verbs(category))
                        .reply_markup(category_keyboard())
                        .await?;
                    dialogue
                        .update(State::ReceiveCategory {
                            tense: session.settings.tense,
                            progress: session.progress(),
                        })
                        .await?;
                    Ok(())
                }
            }
        }
        Some(LISTEN) => {
            spawn_pronunciation(bot, pronouncer, msg.chat.id, verdict.correct_answer);
            Ok(())
        }
        Some(CHART) => send_chart(bot, msg.chat.id, &session).await,
        Some(SETTINGS) => {
            ask_tense(
                bot,
                dialogue,
                msg.chat.id,
                messages::CHOOSE_TENSE,
                session.progress(),
            )
            .await
        }
        Some(RESET_STATS) => {
            let mut session = session;
            session.stats.reset();
            bot.send_message(msg.chat.id, messages::STATS_RESET)
                .reply_markup(reviewing_keyboard())
                .await?;
            dialogue
                .update(State::Reviewing { session, verdict })
                .await?;
            Ok(())
        }
        // The answer is already judged; a second submission is not evaluated
        _ => {
            bot.send_message(msg.chat.id, messages::PRESS_NEXT)
                .reply_markup(reviewing_keyboard())
                .await?;
            Ok(())
        }
    }
}

async fn send_chart(bot: Bot, chat_id: ChatId, session: &Session) -> HandlerResult {
    let verb = &session.round.verb;
    let tense = session.settings.tense;
    let chart = messages::conjugation_chart(verb, tense, session.round.subject);
    bot.send_message(chat_id, chart)
        .parse_mode(ParseMode::Html)
        .reply_markup(chart_keyboard(verb, tense))
        .await?;
    Ok(())
}

async fn listen_to_chart_form(
    bot: Bot,
    q: CallbackQuery,
    pronouncer: Arc<Pronouncer>,
) -> HandlerResult {
    // Stops the loading spinner on the button
    bot.answer_callback_query(q.id.clone()).await?;

    let form = q.data.as_deref().and_then(form_to_say);
    match (form, q.message) {
        (Some(form), Some(message)) => {
            spawn_pronunciation(bot, pronouncer, message.chat.id, form.to_string());
        }
        (None, _) => warn!("Unexpected callback data {:?}", q.data),
        (Some(_), None) => debug!("Callback query without a message, nothing to answer"),
    }
    Ok(())
}

fn spawn_pronunciation(bot: Bot, pronouncer: Arc<Pronouncer>, chat_id: ChatId, text: String) {
    tokio::spawn(async move {
        pronouncer.pronounce(&bot, chat_id, &text).await;
    });
}

/// Fetches an example sentence in the background. It is only sent if the chat
/// is still looking at the same round when it arrives.
fn spawn_example(
    bot: Bot,
    dialogue: QuizDialogue,
    quiz_helper: Arc<QuizHelper>,
    session: &Session,
) {
    let chat_id = dialogue.chat_id();
    let infinitive = session.round.verb.infinitive.clone();
    let tense = session.settings.tense;
    let subject = session.round.subject;
    let round_number = session.round_number;

    tokio::spawn(async move {
        let _ = bot.send_chat_action(chat_id, ChatAction::Typing).await;

        let Some(example) = quiz_helper.example_sentence(&infinitive, tense, subject).await else {
            return;
        };

        match dialogue.get().await {
            Ok(Some(state)) if example_is_current(&state, round_number) => {
                if let Err(err) = bot
                    .send_message(chat_id, messages::example(&example))
                    .parse_mode(ParseMode::Html)
                    .await
                {
                    error!("Failed to send example to chat {}: {}", chat_id, err);
                }
            }
            Ok(_) => debug!(
                "Chat {}: dropping stale example for round {}",
                chat_id, round_number
            ),
            Err(err) => error!("Failed to read dialogue of chat {}: {}", chat_id, err),
        }
    });
}

/// An example belongs on screen only while its round's verdict is showing.
fn example_is_current(state: &State, round_number: u64) -> bool {
    matches!(state, State::Reviewing { session, .. } if session.round_number == round_number)
}
