use clap::{Parser, Subcommand};
use log::info;
use phonora::{
    AlignmentStrategy, DictionaryStore, PhonemeDictionary, PronunciationAssessor, SentenceBank,
};
use phonora_http::{AppState, NoRecognizer, SpeechRecognizer, WhisperConfig, WhisperRecognizer};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Subcommand, Debug)]
enum Mode {
    /// Score a recognized transcript against a reference sentence
    #[command(alias = "s")]
    Score {
        /// The sentence the learner was asked to read
        #[arg(short = 's', long = "sentence")]
        sentence: String,

        /// What the recognizer heard; read from stdin when omitted
        #[arg(short = 'r', long = "recognized")]
        recognized: Option<String>,
    },

    /// Print the phonemes of every word in a text
    #[command(alias = "p")]
    Phonemes {
        /// Text to transcribe
        text: String,
    },

    /// Print a random selection of practice sentences
    Sentences {
        #[arg(short = 'l', long = "level", default_value = "beginner")]
        level: String,

        #[arg(short = 'n', long = "count", default_value_t = 10)]
        count: usize,
    },

    /// Download the pronunciation dictionary into the local cache
    #[command(name = "fetch-dict")]
    FetchDict,

    /// Start the HTTP service used by the web frontend
    Serve {
        /// IP address to bind to (typically 127.0.0.1 or 0.0.0.0)
        #[arg(long, default_value_t = [0, 0, 0, 0].into())]
        ip: IpAddr,

        /// Port to expose the HTTP server on
        #[arg(long, default_value_t = 5000)]
        port: u16,

        /// Directory with static frontend files served at `/`
        #[arg(long = "frontend", value_name = "DIR")]
        frontend: Option<PathBuf>,

        /// Base URL of an OpenAI-compatible speech-to-text API
        #[arg(long = "stt-url", value_name = "URL")]
        stt_url: Option<String>,

        /// Transcription model name
        #[arg(long = "stt-model", default_value = "whisper-1")]
        stt_model: String,

        /// Bearer token for the speech-to-text API
        #[arg(long = "stt-api-key", env = "STT_API_KEY", hide_env_values = true)]
        stt_api_key: Option<String>,

        /// Seconds to wait for a transcription before giving up
        #[arg(long = "stt-timeout", default_value_t = 60)]
        stt_timeout: u64,
    },
}

#[derive(Parser, Debug)]
#[command(name = "phono")]
#[command(version)]
struct Cli {
    /// Path to a cmudict-format dictionary; downloaded and cached when omitted
    #[arg(short = 'd', long = "dict", value_name = "DICT_PATH", global = true)]
    dict_path: Option<PathBuf>,

    /// Path to the practice sentence bank
    #[arg(
        long = "sentences",
        value_name = "SENTENCES_PATH",
        default_value = "data/sentences.json",
        global = true
    )]
    sentences_path: PathBuf,

    /// How recognized words are paired with reference words
    #[arg(long = "strategy", default_value = "positional", global = true)]
    strategy: AlignmentStrategy,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", default_value_t = false, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

async fn load_dictionary(custom_path: Option<&Path>) -> phonora::Result<Arc<PhonemeDictionary>> {
    let store = DictionaryStore::new()?;
    let path = store.resolve(custom_path).await?;
    Ok(Arc::new(PhonemeDictionary::from_path(path)?))
}

fn recognizer(
    stt_url: Option<String>,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
) -> Arc<dyn SpeechRecognizer> {
    match stt_url {
        Some(base_url) => Arc::new(WhisperRecognizer::new(WhisperConfig {
            base_url,
            api_key,
            model,
            timeout,
            ..WhisperConfig::default()
        })),
        None => Arc::new(NoRecognizer),
    }
}

/// Reads a whole transcript, e.g. piped from a recognizer, trimmed.
async fn read_transcript<R: AsyncRead + Unpin>(mut input: R) -> std::io::Result<String> {
    let mut buf = String::new();
    input.read_to_string(&mut buf).await?;
    Ok(buf.trim().to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        dict_path,
        sentences_path,
        strategy,
        verbose,
        mode,
    } = Cli::parse();

    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    ctrlc::set_handler(move || {
        eprintln!("Received termination signal, exiting.");
        std::process::exit(0);
    })?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match mode {
            Mode::Score {
                sentence,
                recognized,
            } => {
                let recognized = match recognized {
                    Some(text) => text,
                    None => read_transcript(tokio::io::stdin()).await?,
                };

                let dict = load_dictionary(dict_path.as_deref()).await?;
                let assessor = PronunciationAssessor::builder(dict)
                    .strategy(strategy)
                    .build();
                let assessment = assessor.assess(&sentence, &recognized)?;

                println!("Sentence: {sentence}");
                println!("Recognized: {}", assessment.recognized);
                println!("\n--- FEEDBACK ---");
                for result in &assessment.results {
                    println!("{} → {}", result.word, result.status);
                }
            }

            Mode::Phonemes { text } => {
                let dict = load_dictionary(dict_path.as_deref()).await?;
                let assessor = PronunciationAssessor::new(dict);
                for entry in assessor.transcriber().transcribe(&text).iter() {
                    if entry.is_out_of_vocabulary() {
                        println!("{}\t<oov>", entry.word);
                    } else {
                        println!("{}\t{}", entry.word, entry.phonemes.join(" "));
                    }
                }
            }

            Mode::Sentences { level, count } => {
                let bank = SentenceBank::from_path(&sentences_path)?;
                for sentence in bank.sample(&level, count, &mut rand::thread_rng())? {
                    println!("{}", sentence.text);
                }
            }

            Mode::FetchDict => {
                let store = DictionaryStore::new()?;
                let path = store.ensure(phonora::dict::store::DEFAULT_DICTIONARY).await?;
                println!("{}", path.display());
            }

            Mode::Serve {
                ip,
                port,
                frontend,
                stt_url,
                stt_model,
                stt_api_key,
                stt_timeout,
            } => {
                let dict = load_dictionary(dict_path.as_deref()).await?;
                let sentences = SentenceBank::from_path(&sentences_path)?;
                let recognizer = recognizer(
                    stt_url,
                    stt_model,
                    stt_api_key,
                    Duration::from_secs(stt_timeout),
                );
                info!("speech recognizer: {}", recognizer.name());

                let state = AppState {
                    assessor: PronunciationAssessor::builder(dict)
                        .strategy(strategy)
                        .build(),
                    sentences,
                    recognizer,
                };
                let app = phonora_http::create_server(state, frontend.as_deref());
                let addr = SocketAddr::from((ip, port));
                let binding = tokio::net::TcpListener::bind(&addr).await?;
                info!("Starting pronunciation service on http://{addr}");
                phonora_http::serve(binding, app).await?;
            }
        }

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
