//! Command line front end for the comment panels. See `comments_lib` for details.

extern crate clap;
extern crate comments_lib;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;

use std::io::{self, BufRead, Write};
use std::process;

use clap::{Parser, Subcommand};
use failure::Error as FailureError;

use comments_lib::config::Config;
use comments_lib::controller::{CommentForm, Confirm, DynamicContext, ModerationConsole, OwnComments, ThreadView, Viewer};
use comments_lib::errors;
use comments_lib::models::*;

#[derive(Parser, Debug)]
#[command(name = "comments", version, about = "Storefront comments: threads, submission and moderation")]
struct Args {
    /// Id of the signed in user
    #[arg(long, global = true)]
    user_id: Option<i32>,
    /// Act as an administrator
    #[arg(long, global = true)]
    admin: bool,
    /// Overrides the configured panel locale (fa, en)
    #[arg(long, global = true)]
    locale: Option<String>,
    /// Skip confirmation prompts of destructive commands
    #[arg(long, short = 'y', global = true)]
    yes: bool,
    #[command(subcommand)]
    command: CliCmd,
}

#[derive(Subcommand, Debug)]
enum CliCmd {
    /// Show the moderation table
    List {
        #[arg(long)]
        search: Option<String>,
        /// all, approved or unapproved
        #[arg(long, default_value = "all")]
        status: ApprovalFilter,
        /// all, seen or unseen
        #[arg(long, default_value = "all")]
        seen: SeenFilter,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show the public thread of a commentable
    Thread {
        commentable_type: String,
        commentable_id: i32,
        /// Expand replies of every comment
        #[arg(long)]
        expand: bool,
    },
    /// Submit a comment or a reply
    Post {
        commentable_type: String,
        commentable_id: i32,
        body: String,
        #[arg(long)]
        reply_to: Option<i32>,
    },
    /// Apply approve, disapprove, mark-seen or delete to comments of one page
    Bulk {
        action: BulkAction,
        #[arg(required = true)]
        ids: Vec<i32>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Edit a comment from the moderation table
    Edit {
        id: i32,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        approved: Option<bool>,
        #[arg(long)]
        status: Option<bool>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    ToggleApproval {
        id: i32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    ToggleStatus {
        id: i32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    MarkSeen {
        id: i32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Delete {
        id: i32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List, edit or delete own comments
    Mine {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, requires = "body")]
        edit: Option<i32>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long, conflicts_with = "edit")]
        delete: Option<i32>,
    },
}

/// Asks on stdin, anything but `y`/`yes` declines
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        print!("{} [y/N] ", question);
        let _ = io::stdout().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => match answer.trim().to_lowercase().as_ref() {
                "y" | "yes" => true,
                _ => false,
            },
            Err(_) => false,
        }
    }
}

fn report(notification: Option<Notification>) {
    if let Some(notification) = notification {
        if notification.is_error() {
            eprintln!("{}", notification);
        } else {
            println!("{}", notification);
        }
    }
}

fn run(args: Args, config: Config) -> Result<(), FailureError> {
    let locale: Locale = match args.locale {
        Some(ref code) => code.parse().unwrap_or_else(|_| config.locale()),
        None => config.locale(),
    };
    let viewer = args.user_id.map(|id| Viewer {
        id: UserId(id),
        name: None,
        is_admin: args.admin,
    });
    let context = DynamicContext::new(viewer, locale);
    let static_context = comments_lib::create_static_context(config)?;
    let service = &static_context.service;

    let always = |_: &str| true;
    let confirm: &dyn Confirm = if args.yes { &always } else { &StdinConfirm };

    let open_console = |page: u32| -> Result<ModerationConsole, FailureError> {
        let mut console = ModerationConsole::new(context.clone());
        console.apply_filter(service, CommentsFilter::default())?;
        if page > 1 {
            console.go_to_page(service, page)?;
        }
        Ok(console)
    };

    match args.command {
        CliCmd::List { search, status, seen, page } => {
            let mut console = ModerationConsole::new(context.clone());
            let filter = CommentsFilter {
                search,
                approval: status,
                seen,
                ..Default::default()
            };
            console.apply_filter(service, filter)?;
            if page > 1 {
                console.go_to_page(service, page)?;
            }
            print!("{}", console.render());
        }
        CliCmd::Thread {
            commentable_type,
            commentable_id,
            expand,
        } => {
            let mut view = ThreadView::new(&[], Commentable::new(commentable_type, commentable_id), context.clone());
            view.fetch(service)?;
            if expand {
                view.expand_all();
            }
            print!("{}", view.render());
        }
        CliCmd::Post {
            commentable_type,
            commentable_id,
            body,
            reply_to,
        } => {
            let target = Commentable::new(commentable_type, commentable_id);
            let mut form = match reply_to {
                Some(parent_id) => CommentForm::reply(target, CommentId(parent_id)),
                None => CommentForm::new(target),
            };
            form.set_body(&body);
            report(form.submit(service, locale, || ()));
            if let Some(error) = form.error("body") {
                eprintln!("✘ {}", error);
            }
        }
        CliCmd::Bulk { action, ids, page } => {
            let mut console = open_console(page)?;
            for id in ids {
                if !console.toggle_select(CommentId(id)) {
                    warn!("Comment {} is not on page {}, skipped.", id, page);
                }
            }
            report(console.bulk(service, action, confirm));
        }
        CliCmd::Edit {
            id,
            body,
            approved,
            status,
            page,
        } => {
            let mut console = open_console(page)?;
            console.open_edit(CommentId(id))?;
            if let Some(dialog) = console.edit_dialog_mut() {
                if let Some(ref body) = body {
                    dialog.set_body(body);
                }
                dialog.approved = approved.unwrap_or(dialog.approved);
                dialog.status = status.unwrap_or(dialog.status);
            }
            report(console.save_edit(service));
            if let Some(error) = console.edit_dialog().and_then(|dialog| dialog.error.clone()) {
                eprintln!("✘ {}", error);
            }
        }
        CliCmd::ToggleApproval { id, page } => report(Some(open_console(page)?.toggle_approval(service, CommentId(id)))),
        CliCmd::ToggleStatus { id, page } => report(Some(open_console(page)?.toggle_status(service, CommentId(id)))),
        CliCmd::MarkSeen { id, page } => report(Some(open_console(page)?.mark_seen(service, CommentId(id)))),
        CliCmd::Delete { id, page } => report(open_console(page)?.delete(service, CommentId(id), confirm)),
        CliCmd::Mine { page, edit, body, delete } => {
            let mut panel = OwnComments::new(context.clone());
            panel.load(service, page)?;
            match (edit, body, delete) {
                (Some(id), Some(body), _) => report(Some(panel.edit(service, CommentId(id), &body)?)),
                (_, _, Some(id)) => report(Some(panel.delete(service, CommentId(id), confirm)?)),
                _ => (),
            }
            print!("{}", panel.render());
        }
    }
    Ok(())
}

fn main() {
    let config = Config::new().expect("Can't load app config!");

    // Prepare logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();

    let args = Args::parse();
    let locale = config.locale();
    if let Err(e) = run(args, config) {
        error!("{}", e);
        eprintln!("✘ {}", errors::describe(&e, locale));
        process::exit(1);
    }
}
