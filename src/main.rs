use std::io::{self, Write};
use std::path::Path;
use std::{env, fs, process};

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crmctl::{
    ApiClient, ApiConfig, AuthApi, DocumentsApi, EntityApi, KeyringStore, ListParams, LoginRequest,
};

fn usage() -> ! {
    eprintln!("usage: crmctl <command>");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  login                       authenticate and store the session token");
    eprintln!("  logout                      end the session and clear the token");
    eprintln!("  whoami                      show the authenticated user");
    eprintln!("  list <Entity>               list records (e.g. `crmctl list Lead`)");
    eprintln!("  get <Entity> <id>           fetch one record");
    eprintln!("  delete <Entity> <id>        delete a record");
    eprintln!("  search <Entity> <query>     search records");
    eprintln!("  upload <file> [folder]      upload a document");
    process::exit(2);
}

/// Quick and dirty function to read input from the user.
fn interactive_prompt(prompt_type: &str) -> String {
    let mut response = String::new();
    print!("Please enter your {prompt_type}: ");
    io::stdout().flush().expect("should be able to flush stdout");
    io::stdin()
        .read_line(&mut response)
        .expect("should be able to read response");

    // Remove newline
    response.trim_end().to_string()
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }

    let config = ApiConfig::from_env()?;
    let store = KeyringStore::new()?;
    let client = ApiClient::new(config, Box::new(store));

    match (args[0].as_str(), &args[1..]) {
        ("login", []) => {
            let request = LoginRequest {
                email: interactive_prompt("email"),
                password: interactive_prompt("password"),
            };
            let session = AuthApi::new(&client).login(&request).await?;
            println!("Logged in as {} <{}>", session.user.name, session.user.email);
        }
        ("logout", []) => {
            AuthApi::new(&client).logout().await?;
            println!("Logged out.");
        }
        ("whoami", []) => {
            let user = AuthApi::new(&client).me().await?;
            print_json(&serde_json::to_value(&user)?);
        }
        ("list", [entity]) => {
            let records: Value = EntityApi::new(&client, entity)
                .list(ListParams::default())
                .await?;
            print_json(&records);
        }
        ("get", [entity, id]) => {
            let record: Value = EntityApi::new(&client, entity).get(id).await?;
            print_json(&record);
        }
        ("delete", [entity, id]) => {
            EntityApi::new(&client, entity).delete(id).await?;
            println!("Deleted {entity} {id}.");
        }
        ("search", [entity, query]) => {
            let records: Value = EntityApi::new(&client, entity)
                .search(query, ListParams::default())
                .await?;
            print_json(&records);
        }
        ("upload", rest) if !rest.is_empty() && rest.len() <= 2 => {
            let path = &rest[0];
            let folder = rest.get(1).map(String::as_str).unwrap_or("documents");
            let contents = fs::read(path)?;
            let file_name = Path::new(path)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("upload.bin");
            let document = DocumentsApi::new(&client)
                .upload(file_name, contents, folder)
                .await?;
            print_json(&document);
        }
        _ => usage(),
    }

    Ok(())
}
