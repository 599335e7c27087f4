//! Shipment commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use logistik_core::shipment::{
    self,
    model::{LegCosts, LegPartners, ShipmentStatus},
    NewShipment,
};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum ShipmentCommands {
    /// Record a new shipment request
    New(NewShipmentArgs),

    /// List shipments with their traffic lights
    List {
        /// Only shipments in this status
        #[arg(short, long)]
        status: Option<String>,

        /// Only shipments of this customer
        #[arg(short, long)]
        customer: Option<i64>,
    },

    /// Show one shipment with its milestone checklist
    Show { id: i64 },

    /// Quote a request
    Offer { id: i64, price: f64 },

    /// Customer accepted the quote
    Accept { id: i64 },

    /// Reject a request or quote
    Reject {
        id: i64,

        /// Reason shown on the shipment
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Mark as booked with the carrier
    Book { id: i64 },

    /// Move to an operational status (e.g. "Zoll")
    Move { id: i64, status: String },

    /// Set leg costs
    Costs(CostsArgs),

    /// Set planned dates (YYYY-MM-DD or DD.MM.YYYY)
    Dates(DatesArgs),

    /// Assign partners to legs
    Partners(PartnersArgs),

    /// Mark a milestone done
    Done { id: i64, milestone: u32 },

    /// Reopen a completed milestone
    Undo { id: i64, milestone: u32 },

    /// Delete a shipment
    Delete { id: i64 },
}

#[derive(Args)]
pub struct NewShipmentArgs {
    /// Transport type (AIR, SEA, TRUCK)
    pub transport: String,

    /// Direction (EXPORT or IMPORT)
    #[arg(short, long, default_value = "EXPORT")]
    pub direction: String,

    /// Customer ID
    #[arg(short, long)]
    pub customer: Option<i64>,

    /// Origin
    #[arg(long)]
    pub from: Option<String>,

    /// Destination
    #[arg(long)]
    pub to: Option<String>,

    /// Planned pickup date
    #[arg(long)]
    pub pickup_date: Option<String>,

    /// Planned main-leg departure
    #[arg(long)]
    pub departure: Option<String>,

    /// Planned delivery date
    #[arg(long)]
    pub delivery_date: Option<String>,
}

#[derive(Args)]
pub struct CostsArgs {
    pub id: i64,

    #[arg(long)]
    pub pickup: Option<f64>,

    #[arg(long)]
    pub main: Option<f64>,

    #[arg(long)]
    pub delivery: Option<f64>,
}

#[derive(Args)]
pub struct DatesArgs {
    pub id: i64,

    #[arg(long)]
    pub pickup: Option<String>,

    #[arg(long)]
    pub departure: Option<String>,

    #[arg(long)]
    pub delivery: Option<String>,
}

#[derive(Args)]
pub struct PartnersArgs {
    pub id: i64,

    #[arg(long)]
    pub pickup: Option<i64>,

    #[arg(long)]
    pub main: Option<i64>,

    #[arg(long)]
    pub delivery: Option<i64>,
}

pub fn execute(cmd: ShipmentCommands, ctx: &Context) -> Result<()> {
    let pool = ctx.pool()?;
    let rule = ctx.rule();

    // Write commands print the refreshed shipment afterwards.
    let changed = match cmd {
        ShipmentCommands::New(args) => {
            let created = shipment::create_request(
                &pool,
                &NewShipment {
                    customer_id: args.customer,
                    transport_type: args.transport,
                    direction: Some(args.direction),
                    origin: args.from,
                    destination: args.to,
                    pickup_date: args.pickup_date,
                    flight_departure: args.departure,
                    delivery_date: args.delivery_date,
                },
            )?;
            println!(
                "{} Created request {} ({})",
                "✓".green().bold(),
                created.position.cyan(),
                created.catalog.as_str().dimmed()
            );
            return Ok(());
        }

        ShipmentCommands::List { status, customer } => {
            let views = match customer {
                Some(customer_id) => {
                    let today = logistik_core::ampel::today();
                    shipment::list_customer_shipments(&pool, customer_id)?
                        .into_iter()
                        .filter(|s| {
                            status
                                .as_deref()
                                .map_or(true, |st| s.status == ShipmentStatus::parse(st))
                        })
                        .map(|s| shipment::model::ShipmentView::new(s, rule, today))
                        .collect()
                }
                None => {
                    let status = status.as_deref().map(ShipmentStatus::parse);
                    shipment::list_shipment_views(&pool, status.as_ref(), rule)?
                }
            };
            output::print_shipments_table(&views);
            return Ok(());
        }

        ShipmentCommands::Show { id } => {
            let view = shipment::get_shipment_view(&pool, id, rule)?;
            output::print_shipment(&view);
            return Ok(());
        }

        ShipmentCommands::Delete { id } => {
            shipment::delete_shipment(&pool, id)?;
            println!("{} Deleted shipment {}", "✓".green().bold(), id);
            return Ok(());
        }

        ShipmentCommands::Offer { id, price } => shipment::create_offer(&pool, id, price)?,
        ShipmentCommands::Accept { id } => shipment::accept_offer(&pool, id)?,
        ShipmentCommands::Reject { id, reason } => {
            shipment::reject_offer(&pool, id, reason.as_deref())?
        }
        ShipmentCommands::Book { id } => shipment::book(&pool, id)?,
        ShipmentCommands::Move { id, status } => {
            shipment::move_shipment(&pool, id, &ShipmentStatus::parse(&status))?
        }
        ShipmentCommands::Costs(args) => shipment::update_costs(
            &pool,
            args.id,
            LegCosts {
                pickup: args.pickup,
                main: args.main,
                delivery: args.delivery,
            },
        )?,
        ShipmentCommands::Dates(args) => shipment::update_dates(
            &pool,
            args.id,
            args.pickup.as_deref(),
            args.departure.as_deref(),
            args.delivery.as_deref(),
        )?,
        ShipmentCommands::Partners(args) => shipment::assign_partners(
            &pool,
            args.id,
            LegPartners {
                pickup: args.pickup,
                main: args.main,
                delivery: args.delivery,
            },
        )?,
        ShipmentCommands::Done { id, milestone } => {
            shipment::complete_milestone(&pool, id, milestone)?
        }
        ShipmentCommands::Undo { id, milestone } => {
            shipment::reopen_milestone(&pool, id, milestone)?
        }
    };

    let view = shipment::model::ShipmentView::new(changed, rule, logistik_core::ampel::today());
    println!(
        "{} {} is now {}",
        "✓".green().bold(),
        view.shipment.position.cyan(),
        output::status_colored(&view.shipment.status)
    );
    output::print_lights_line(&view.lights);

    Ok(())
}
