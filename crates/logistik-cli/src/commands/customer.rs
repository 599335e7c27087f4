//! Customer commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use logistik_core::contact::ContactInfo;
use logistik_core::customer::{self, model::NewCustomer};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Add a customer
    New(NewCustomerArgs),

    /// List customers
    List,

    /// Delete a customer without shipments
    Delete { id: i64 },
}

#[derive(Args)]
pub struct NewCustomerArgs {
    /// Company name
    pub name: String,

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

pub fn execute(cmd: CustomerCommands, ctx: &Context) -> Result<()> {
    let pool = ctx.pool()?;

    match cmd {
        CustomerCommands::New(args) => {
            let customer = customer::create_customer(
                &pool,
                &NewCustomer {
                    name: args.name,
                    contact: ContactInfo {
                        address: args.address,
                        contacts: args.contacts,
                        phones: args.phones,
                        emails: args.emails,
                    },
                },
            )?;
            println!(
                "{} Created customer: {} ({})",
                "✓".green().bold(),
                customer.name.cyan(),
                format!("#{}", customer.id).dimmed()
            );
        }

        CustomerCommands::List => {
            let customers = customer::list_customers(&pool)?;
            output::print_customers(&customers);
        }

        CustomerCommands::Delete { id } => {
            customer::delete_customer(&pool, id)?;
            println!("{} Deleted customer #{}", "✓".green().bold(), id);
        }
    }

    Ok(())
}
