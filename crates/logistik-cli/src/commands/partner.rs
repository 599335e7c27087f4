//! Partner commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use logistik_core::contact::ContactInfo;
use logistik_core::partner::{
    self,
    model::{NewPartner, PartnerType},
};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum PartnerCommands {
    /// Add a partner
    New(NewPartnerArgs),

    /// List partners
    List {
        /// Only partners of this type
        #[arg(short = 't', long = "type", value_parser = parse_partner_type)]
        partner_type: Option<PartnerType>,
    },

    /// Delete a partner not assigned to any shipment
    Delete { id: i64 },
}

#[derive(Args)]
pub struct NewPartnerArgs {
    /// Company name
    pub name: String,

    /// Partner type (carrier, agent, customs, haulier)
    #[arg(short = 't', long = "type", default_value = "carrier", value_parser = parse_partner_type)]
    pub partner_type: PartnerType,

    #[arg(short, long)]
    pub address: Option<String>,

    /// Contact person (repeatable)
    #[arg(long = "contact")]
    pub contacts: Vec<String>,

    /// Phone number (repeatable)
    #[arg(long = "phone")]
    pub phones: Vec<String>,

    /// Email address (repeatable)
    #[arg(long = "email")]
    pub emails: Vec<String>,
}

fn parse_partner_type(s: &str) -> Result<PartnerType, String> {
    PartnerType::parse(s)
        .ok_or_else(|| format!("unknown partner type '{}' (carrier, agent, customs, haulier)", s))
}

pub fn execute(cmd: PartnerCommands, ctx: &Context) -> Result<()> {
    let pool = ctx.pool()?;

    match cmd {
        PartnerCommands::New(args) => {
            let partner = partner::create_partner(
                &pool,
                &NewPartner {
                    name: args.name,
                    partner_type: args.partner_type,
                    contact: ContactInfo {
                        address: args.address,
                        contacts: args.contacts,
                        phones: args.phones,
                        emails: args.emails,
                    },
                },
            )?;
            println!(
                "{} Created {}: {} ({})",
                "✓".green().bold(),
                partner.partner_type,
                partner.name.cyan(),
                format!("#{}", partner.id).dimmed()
            );
        }

        PartnerCommands::List { partner_type } => {
            let partners = partner::list_partners(&pool, partner_type)?;
            output::print_partners(&partners);
        }

        PartnerCommands::Delete { id } => {
            partner::delete_partner(&pool, id)?;
            println!("{} Deleted partner #{}", "✓".green().bold(), id);
        }
    }

    Ok(())
}
