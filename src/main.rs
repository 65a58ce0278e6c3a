//! seedcipher 命令行
//!
//! 使用方式:
//!   cargo run -- generate --words 24
//!   cargo run -- transform -i 5 -m 131072 --file seed.txt --output result
//!   cargo run -- derive --network bitcoin --network ethereum --count 3

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{debug, error, info};
use serde::Serialize;
use serde_json::json;
use zeroize::Zeroizing;

use seedcipher::config::{DEFAULT_ITERATIONS, DEFAULT_MEMORY_COST_KIB};
use seedcipher::{
    AddressSet, CipherParams, DerivationConfig, Mnemonic, SeedError, TransformJob,
    derive_addresses_with, generate_seed_phrase, get_bip39_wordlist, validate_bip39_word,
    validate_seed_phrase,
};

/// 命令行自身的错误
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// `--json` 下输出助记词; 只借用, 不复制明文
#[derive(Serialize)]
struct PhraseOutput<'a> {
    phrase: &'a str,
}

/// 序列化结果本身也含明文, 放入 Zeroizing
fn phrase_json(phrase: &str) -> anyhow::Result<Zeroizing<String>> {
    Ok(Zeroizing::new(serde_json::to_string(&PhraseOutput { phrase })?))
}

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "seedcipher")]
#[command(about = "BIP39 助记词可逆变换 (Argon2id + XOR) 与多网络地址派生")]
#[command(version = "0.1.0")]
struct Args {
    /// 以 JSON 格式输出
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 变换助记词 (XOR 对称, 加密与解密为同一操作)
    Transform {
        /// 解密模式 (仅影响提示信息)
        #[arg(short, long, default_value_t = false)]
        decrypt: bool,

        /// 从文件读取助记词, 省略时交互输入
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// 结果写入文件 (无扩展名时追加 .txt)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Argon2id 迭代次数
        #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: u32,

        /// Argon2id 内存成本 (KiB)
        #[arg(short, long, value_name = "KIB", default_value_t = DEFAULT_MEMORY_COST_KIB)]
        memory: u32,

        /// 从该环境变量读取口令, 省略时交互输入
        #[arg(long, value_name = "VAR")]
        password_env: Option<String>,
    },

    /// 校验助记词
    Validate {
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// 生成随机助记词
    Generate {
        /// 单词数量: 12 / 15 / 18 / 21 / 24
        #[arg(short, long, default_value_t = 12)]
        words: usize,
    },

    /// 派生地址
    Derive {
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// 网络名称, 可重复
        #[arg(short, long = "network", default_values_t = [String::from("bitcoin"), String::from("ethereum"), String::from("ergo")])]
        networks: Vec<String>,

        /// BIP39 口令 (第 25 个词)
        #[arg(long, env = "SEEDCIPHER_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,

        #[arg(long, default_value_t = 0)]
        account: u32,

        #[arg(long, default_value_t = 0)]
        change: u32,

        /// 起始地址索引
        #[arg(long, default_value_t = 0)]
        index: u32,

        /// 每个网络的地址数量
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },

    /// 输出 BIP39 词表
    Wordlist,

    /// 检查单词是否在 BIP39 词表中
    CheckWord { word: String },
}

/// 读取助记词: 文件优先, 否则隐藏输入
fn read_phrase(file: Option<&Path>) -> anyhow::Result<Zeroizing<String>> {
    let phrase = match file {
        Some(path) => {
            info!("读取助记词文件: {}", path.display());
            Zeroizing::new(std::fs::read_to_string(path)?)
        }
        None => Zeroizing::new(rpassword::prompt_password("Seed phrase: ")?),
    };
    Ok(Zeroizing::new(phrase.trim().to_string()))
}

/// 读取口令; 加密模式下交互输入需要确认
fn read_password(env_var: Option<&str>, confirm: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(var) = env_var {
        let password = Zeroizing::new(std::env::var(var)?);
        // SAFETY: 在启动任何工作线程之前调用, 此时进程仍是单线程
        unsafe { std::env::remove_var(var) };
        debug!("已从环境中移除 {}", var);
        return Ok(password);
    }

    let password = Zeroizing::new(rpassword::prompt_password("Password: ")?);
    if confirm {
        let again = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);
        if *password != *again {
            return Err(CliError::PasswordMismatch.into());
        }
    }
    Ok(password)
}

/// 写入结果文件, 无扩展名时追加 .txt
fn save_to_file(path: &Path, content: &str) -> anyhow::Result<PathBuf> {
    let path = if path.extension().is_none() {
        path.with_extension("txt")
    } else {
        path.to_path_buf()
    };
    let mut file = std::fs::File::create(&path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(path)
}

fn print_addresses(set: &AddressSet) {
    for entry in &set.networks {
        println!("[{}]", entry.network);
        if let Some(e) = &entry.error {
            println!("  error: {}", e);
            continue;
        }
        for record in &entry.addresses {
            println!("  {:<28} {:<20} {}", record.address_type, record.path, record.address);
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Command::Transform {
            decrypt,
            file,
            output,
            iterations,
            memory,
            password_env,
        } => {
            let params = CipherParams::new(iterations, memory);
            // 读取任何秘密前先检查参数
            params.validate()?;

            let mode = if decrypt { "Decryption" } else { "Encryption" };
            info!("{} mode, Argon2id {} iterations, {}KiB memory", mode, iterations, memory);

            let phrase = read_phrase(file.as_deref())?;
            Mnemonic::parse(&phrase)?;

            let password = read_password(password_env.as_deref(), !decrypt)?;
            let job = TransformJob::spawn(&phrase, &password, params)?;
            let result = job.wait()?;

            if let Some(path) = output {
                let saved = save_to_file(&path, &result)?;
                info!("结果已保存: {}", saved.display());
            }

            if args.json {
                println!("{}", phrase_json(&result)?.as_str());
            } else {
                println!("{}", result.as_str());
            }
        }
        Command::Validate { file } => {
            let phrase = read_phrase(file.as_deref())?;
            let result = validate_seed_phrase(&phrase);
            if args.json {
                println!("{}", serde_json::to_string(&result)?);
            } else {
                let mark = if result.valid { "✓" } else { "✗" };
                println!("{} ({} words): {}", mark, result.word_count, result.message);
            }
        }
        Command::Generate { words } => {
            let phrase = generate_seed_phrase(words)?;
            if args.json {
                println!("{}", phrase_json(&phrase)?.as_str());
            } else {
                println!("{}", phrase.as_str());
            }
        }
        Command::Derive {
            file,
            networks,
            passphrase,
            account,
            change,
            index,
            count,
        } => {
            let phrase = read_phrase(file.as_deref())?;
            let passphrase = passphrase.map(Zeroizing::new);
            let config = DerivationConfig::default()
                .with_account(account)
                .with_change(change)
                .with_index(index)
                .with_count(count);

            let set = derive_addresses_with(
                &phrase,
                passphrase.as_ref().map(|p| p.as_str()),
                networks.as_slice(),
                &config,
            )?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                print_addresses(&set);
            }
        }
        Command::Wordlist => {
            let words = get_bip39_wordlist();
            if args.json {
                println!("{}", serde_json::to_string(words)?);
            } else {
                for word in words {
                    println!("{}", word);
                }
            }
        }
        Command::CheckWord { word } => {
            let valid = validate_bip39_word(&word);
            if args.json {
                println!("{}", json!({ "word": word, "valid": valid }));
            } else {
                println!("{}", valid);
            }
        }
    }
    Ok(())
}

/// 错误到退出码: 2 校验, 3 口令/参数, 4 I/O, 5 密码学
fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<SeedError>() {
        return e.exit_code() as u8;
    }
    if err.downcast_ref::<std::io::Error>().is_some() {
        return 4;
    }
    if err.downcast_ref::<std::env::VarError>().is_some()
        || err.downcast_ref::<CliError>().is_some()
    {
        return 3;
    }
    1
}

/// 主函数
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("启动 seedcipher");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
