pub mod state;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;
use seek_service::{
	AdminSearchRequest, Caller, ChatOwnership, ChatScope, ChatSearchRequest, CompanySearchRequest,
	ConferenceSearchRequest, ContactSearchRequest, MessageType, MissionCalendarRequest,
	MissionSearchRequest, MissionSort, MissionStatus, MissionType, SeekService, Visibility,
	time_serde,
};

#[derive(Debug, Parser)]
#[command(
	version = seek_cli::VERSION,
	rename_all = "kebab",
	styles = seek_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Caller uuid, used for self-exclusion and chat scoping.
	#[arg(long, global = true)]
	pub uuid: Option<String>,
	/// Caller position id, used for mission and chat scoping.
	#[arg(long, global = true)]
	pub psid: Option<String>,
	/// Caller company id, used to hide the caller's own company.
	#[arg(long, global = true)]
	pub cid: Option<i64>,
	/// Print the serialized request body that was sent to the index.
	#[arg(long, global = true)]
	pub sniffer: bool,
	#[command(subcommand)]
	pub command: Command,
}
impl Args {
	pub fn caller(&self) -> Caller {
		Caller { uuid: self.uuid.clone(), psid: self.psid.clone(), cid: self.cid }
	}
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum Command {
	/// Companies and people by company name and work title.
	Contact {
		keywords: String,
		#[arg(long)]
		company_id: Option<i64>,
		#[arg(long, default_value_t = 1)]
		page: u32,
		#[arg(long)]
		size: Option<u32>,
	},
	/// Position holders by work title.
	Admin {
		keywords: String,
		#[arg(long = "company")]
		company: Option<i64>,
		#[arg(long, default_value_t = 1)]
		page: u32,
	},
	/// Companies by name.
	Company { keywords: String },
	/// One calendar column of the caller's missions.
	Calendar {
		#[arg(long)]
		status: MissionStatus,
		#[arg(long = "type", default_value = "any")]
		mission_type: MissionType,
		#[arg(long, default_value = "all")]
		visibility: Visibility,
		#[arg(long, default_value_t = 1)]
		page: u32,
	},
	/// Missions by id, skipping deleted ones.
	Missions {
		#[arg(required = true)]
		ids: Vec<i64>,
	},
	/// Full-text search over the caller's missions.
	Mission {
		keywords: String,
		#[arg(long = "status", required = true, value_delimiter = ',')]
		statuses: Vec<MissionStatus>,
		#[arg(long, default_value_t = 1)]
		page: u32,
		#[arg(long, default_value = "created")]
		sort: MissionSort,
	},
	/// Meeting-room reservations by title and organizer.
	Conference {
		keywords: String,
		#[arg(long, default_value_t = 1)]
		page: u32,
	},
	/// Chat transcripts.
	Chat {
		keywords: String,
		/// Search one group channel.
		#[arg(long, conflicts_with_all = ["peer", "groups"])]
		gid: Option<String>,
		/// Search the direct conversation with this user.
		#[arg(long, conflicts_with = "groups")]
		peer: Option<String>,
		/// Search every channel of the caller, including these groups.
		#[arg(long, value_delimiter = ',')]
		groups: Option<Vec<String>>,
		#[arg(long)]
		ownership: Option<ChatOwnership>,
		#[arg(long)]
		message_type: Option<MessageType>,
		#[arg(long, value_parser = time_serde::parse)]
		start: Option<OffsetDateTime>,
		#[arg(long, value_parser = time_serde::parse)]
		end: Option<OffsetDateTime>,
		#[arg(long, default_value_t = 1)]
		page: u32,
		#[arg(long)]
		size: Option<u32>,
	},
}
impl Command {
	fn name(&self) -> &'static str {
		match self {
			Self::Contact { .. } => "contact",
			Self::Admin { .. } => "admin",
			Self::Company { .. } => "company",
			Self::Calendar { .. } => "calendar",
			Self::Missions { .. } => "missions",
			Self::Mission { .. } => "mission",
			Self::Conference { .. } => "conference",
			Self::Chat { .. } => "chat",
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = seek_config::load(&args.config)?;

	init_tracing(&config)?;

	tracing::info!(index_url = %config.index.url, command = args.command.name(), "Running search.");

	let state = AppState::new(config)?;
	let caller = args.caller();
	let mut output = json!({ "results": dispatch(&state.service, args.command, &caller).await? });

	if args.sniffer {
		output["sniffer"] = state.service.sniffer_result().map_or(Value::Null, Value::String);
	}

	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

/// Runs one command and returns its results as JSON.
pub async fn dispatch(
	service: &SeekService,
	command: Command,
	caller: &Caller,
) -> color_eyre::Result<Value> {
	let results = match command {
		Command::Contact { keywords, company_id, page, size } => {
			let req = ContactSearchRequest { keywords, company_id, page, size };

			serde_json::to_value(service.contact_search(req).await?)?
		},
		Command::Admin { keywords, company, page } => {
			let req = AdminSearchRequest { keywords, cid: company, page };

			serde_json::to_value(service.admin_search(req, caller).await?)?
		},
		Command::Company { keywords } => {
			let req = CompanySearchRequest { keywords };

			serde_json::to_value(service.company_search(req, caller).await?)?
		},
		Command::Calendar { status, mission_type, visibility, page } => {
			let req = MissionCalendarRequest { status, mission_type, visibility, page };

			serde_json::to_value(service.mission_calendar(req, caller).await?)?
		},
		Command::Missions { ids } => serde_json::to_value(service.missions_by_id(&ids).await?)?,
		Command::Mission { keywords, statuses, page, sort } => {
			let req = MissionSearchRequest { keywords, statuses, page, sort };

			serde_json::to_value(service.mission_search(req, caller).await?)?
		},
		Command::Conference { keywords, page } => {
			let req = ConferenceSearchRequest { keywords, page };

			serde_json::to_value(service.conference_search(req).await?)?
		},
		Command::Chat {
			keywords,
			gid,
			peer,
			groups,
			ownership,
			message_type,
			start,
			end,
			page,
			size,
		} => {
			let scope = match (gid, peer, groups) {
				(Some(gid), _, _) => Some(ChatScope::Group { gid }),
				(None, Some(peer), _) => Some(ChatScope::Direct { peer }),
				(None, None, Some(gids)) => Some(ChatScope::AllChannels { gids }),
				(None, None, None) => None,
			};
			let req = ChatSearchRequest {
				keywords,
				scope,
				ownership,
				message_type,
				start,
				end,
				page,
				size,
			};

			serde_json::to_value(service.chat_search(req, caller).await?)?
		},
	};

	Ok(results)
}

fn init_tracing(config: &seek_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();

	Ok(())
}
