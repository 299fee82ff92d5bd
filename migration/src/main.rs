use std::{env, fs, path::Path};
use util::{config::AppConfig, paths::storage_root};

mod runner;

#[tokio::main]
async fn main() {
    let db_path = AppConfig::global().database_path.clone();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(&db_path);
            remove_media();
        }
        Some("fresh") => {
            remove_db_file(&db_path);
            remove_media();
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await;
        }
        _ => {
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await;
        }
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if !db_path.exists() {
        println!("DB file does not exist: {}", db_path.display());
        return;
    }
    match fs::remove_file(db_path) {
        Ok(()) => println!("Deleted DB: {}", db_path.display()),
        Err(err) => eprintln!("Failed to delete {}: {}", db_path.display(), err),
    }
}

fn remove_media() {
    let media = storage_root();
    if !media.exists() {
        println!("Media storage does not exist: {}", media.display());
        return;
    }
    match fs::remove_dir_all(&media) {
        Ok(()) => println!("Deleted uploaded media: {}", media.display()),
        Err(err) => eprintln!("Failed to delete {}: {}", media.display(), err),
    }
}

fn create_db_dir(path: &str) {
    if let Err(err) = util::paths::ensure_parent_dir(path) {
        eprintln!("Failed to create DB directory for {}: {}", path, err);
        std::process::exit(1);
    }
}
