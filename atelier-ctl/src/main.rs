use anyhow::{anyhow, Context};
use atelier_api::{Comment, Error as ApiError, SessionToken, Uuid};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Print a project's comment feed
    Feed {
        /// Project id
        project: Uuid,

        /// Ordering of top-level comments, "recent" or "top"
        #[structopt(long)]
        order: Option<String>,
    },

    /// Post a comment
    SubmitComment {
        /// Project id
        project: Uuid,

        /// Comment text
        content: String,

        /// Reply to this comment
        #[structopt(long)]
        parent: Option<Uuid>,
    },

    /// Toggle a like or dislike on a comment
    ToggleReaction {
        /// Comment id
        comment: Uuid,

        /// "like" or "dislike"
        kind: String,
    },
}

fn session_token() -> anyhow::Result<SessionToken> {
    let tok =
        std::env::var("SESSION_TOKEN").context("retrieving SESSION_TOKEN environment variable")?;
    let tok = Uuid::try_parse(&tok).context("parsing SESSION_TOKEN as a session token")?;
    Ok(SessionToken(tok))
}

async fn check(resp: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.bytes().await.context("reading error response")?;
    match ApiError::parse(&body) {
        Ok(err) => Err(anyhow!("server refused the request: {}", err)),
        Err(_) => Err(anyhow!("server answered with status {}", status)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();

    let client = reqwest::Client::new();

    match opt.cmd {
        Command::Feed { project, order } => {
            let mut req = client.get(format!("{}/api/project-feed/{}", opt.host, project));
            if let Some(order) = &order {
                req = req.query(&[("order", order)]);
            }
            // the feed works anonymously; send a session only if we have one
            if let Ok(tok) = session_token() {
                req = req.bearer_auth(tok.0);
            }
            let feed: Vec<Comment> = check(req.send().await?)
                .await?
                .json()
                .await
                .context("parsing feed")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&feed).context("rendering feed")?
            );
        }
        Command::SubmitComment {
            project,
            content,
            parent,
        } => {
            let resp = client
                .post(format!("{}/api/submit-comment", opt.host))
                .bearer_auth(session_token()?.0)
                .json(&serde_json::json!({
                    "project": project,
                    "content": content,
                    "parent": parent,
                }))
                .send()
                .await?;
            check(resp).await?;
        }
        Command::ToggleReaction { comment, kind } => {
            let resp = client
                .post(format!("{}/api/toggle-reaction", opt.host))
                .bearer_auth(session_token()?.0)
                .json(&serde_json::json!({
                    "comment": comment,
                    "type": kind,
                }))
                .send()
                .await?;
            check(resp).await?;
        }
    }

    Ok(())
}
