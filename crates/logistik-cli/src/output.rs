//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use logistik_core::ampel::{AmpelRule, Indicator, TrafficLights};
use logistik_core::customer::model::Customer;
use logistik_core::milestone::{CatalogKey, Group, MilestoneDef, CATALOG_VERSION};
use logistik_core::partner::model::Partner;
use logistik_core::shipment::model::{Overview, ShipmentStatus, ShipmentView};
use unicode_width::UnicodeWidthStr;

/// A single traffic-light dot.
fn light(indicator: Indicator) -> ColoredString {
    match indicator {
        Indicator::Grey => "●".dimmed(),
        Indicator::Yellow => "●".yellow(),
        Indicator::Green => "●".green(),
        Indicator::Red => "●".red().bold(),
    }
}

/// Colored status label.
pub fn status_colored(status: &ShipmentStatus) -> ColoredString {
    paint_status(status, status.as_str())
}

/// Color `text` the way `status` is shown.
fn paint_status(status: &ShipmentStatus, text: &str) -> ColoredString {
    match status {
        ShipmentStatus::Anfrage => text.normal(),
        ShipmentStatus::Angebot => text.cyan(),
        ShipmentStatus::Created => text.blue(),
        ShipmentStatus::Booked => text.green(),
        ShipmentStatus::Abgelehnt => text.red().dimmed(),
        ShipmentStatus::Other(_) => text.yellow(),
    }
}

/// Print the three lights with their group names.
pub fn print_lights_line(lights: &TrafficLights) {
    let parts: Vec<String> = Group::ALL
        .iter()
        .map(|g| format!("{} {}", light(lights.get(*g)), g.as_str()))
        .collect();
    println!("  {}", parts.join("   "));
}

/// Print shipments as a table.
pub fn print_shipments_table(views: &[ShipmentView]) {
    if views.is_empty() {
        println!("{}", "No shipments found.".dimmed());
        return;
    }

    // Position, mode, status and lights take ~50 columns; the route gets the rest.
    let route_width = term_width().saturating_sub(52).clamp(12, 40);

    println!(
        "{} {} {} {} {}",
        pad_right("Position", 14),
        pad_right("Mode", 11),
        pad_right("Status", 12),
        pad_right("A C Z", 6),
        "Route"
    );
    println!("{}", "─".repeat(46 + route_width));

    for view in views {
        let s = &view.shipment;
        let mode = format!("{}/{}", s.transport_type, &s.direction.as_str()[..3]);
        let route = format!(
            "{} → {}",
            s.origin.as_deref().unwrap_or("?"),
            s.destination.as_deref().unwrap_or("?")
        );
        let status = pad_right(&truncate_visual(s.status.as_str(), 12), 12);

        println!(
            "{} {} {} {} {} {}   {}",
            pad_right(&s.position, 14),
            pad_right(&mode, 11),
            paint_status(&s.status, &status),
            light(view.lights.abholung),
            light(view.lights.carrier),
            light(view.lights.zustellung),
            truncate_visual(&route, route_width)
        );
    }

    let late = views.iter().filter(|v| v.lights.any_late()).count();
    println!();
    if late > 0 {
        println!("{} shipment(s), {}", views.len(), format!("{} late", late).red());
    } else {
        println!("{} shipment(s)", views.len());
    }
}

/// Print a single shipment with its checklist.
pub fn print_shipment(view: &ShipmentView) {
    let s = &view.shipment;
    println!(
        "{} {}",
        s.position.cyan().bold(),
        format!("({}, {})", s.catalog.as_str(), s.id).dimmed()
    );
    println!();

    println!("{}: {}", "Status".bold(), status_colored(&s.status));
    println!(
        "{}: {} → {}",
        "Route".bold(),
        s.origin.as_deref().unwrap_or("?"),
        s.destination.as_deref().unwrap_or("?")
    );
    if let Some(customer_id) = s.customer_id {
        println!("{}: #{}", "Customer".bold(), customer_id);
    }
    if let Some(reason) = &s.rejection_reason {
        println!("{}: {}", "Rejected".bold(), reason.red());
    }

    println!();
    println!("{}", "Costs".bold());
    for (label, value) in [
        ("pickup", s.costs.pickup),
        ("main", s.costs.main),
        ("delivery", s.costs.delivery),
    ] {
        println!("  {:<10} {}", label, money(value));
    }
    println!("  {:<10} {}", "total", money(Some(view.total_cost)).bold());
    if let Some(price) = s.offer_price {
        println!("  {:<10} {}", "offer", money(Some(price)));
    }
    if let Some(margin) = view.margin {
        let formatted = money(Some(margin));
        println!(
            "  {:<10} {}",
            "margin",
            if margin < 0.0 { formatted.red() } else { formatted.green() }
        );
    }

    for progress in &view.groups {
        let group = progress.group;
        let planned = match group {
            Group::Abholung => s.pickup_date.as_deref(),
            Group::Carrier => s.flight_departure.as_deref(),
            Group::Zustellung => s.delivery_date.as_deref(),
        };

        println!();
        println!(
            "{} {} {} {}",
            light(view.lights.get(group)),
            group.as_str().to_uppercase().bold(),
            format!("{}/{}", progress.completed, progress.total).dimmed(),
            planned.map(|d| format!("planned {}", d)).unwrap_or_default().dimmed()
        );

        for m in view.milestones.iter().filter(|m| m.group == group) {
            let mark = if m.done { "✓".green() } else { "·".dimmed() };
            let text = if m.done { m.text.normal() } else { m.text.dimmed() };
            println!("  {} {:>2} {}", mark, m.id, text);
        }
    }
}

/// Print the milestone list of one catalog.
pub fn print_catalog(key: CatalogKey, milestones: &[MilestoneDef]) {
    println!(
        "{} {}",
        key.as_str().cyan().bold(),
        format!("(catalog v{})", CATALOG_VERSION).dimmed()
    );

    for group in Group::ALL {
        let members: Vec<&MilestoneDef> = milestones.iter().filter(|m| m.group == group).collect();
        println!();
        if members.is_empty() {
            println!("{} {}", group.as_str().to_uppercase().bold(), "(none)".dimmed());
            continue;
        }
        println!("{}", group.as_str().to_uppercase().bold());
        for m in members {
            println!("  {:>2} {}", m.id, m.text);
        }
    }
}

/// Print customers.
pub fn print_customers(customers: &[Customer]) {
    if customers.is_empty() {
        println!("{}", "No customers found.".dimmed());
        return;
    }

    println!("{:<6} {:<30} {}", "ID", "Name", "Contact");
    println!("{}", "─".repeat(65));
    for c in customers {
        println!(
            "{:<6} {} {}",
            c.id,
            pad_right(&truncate_visual(&c.name, 30), 30),
            first_contact(&c.contact.emails, &c.contact.phones).dimmed()
        );
    }
}

/// Print partners.
pub fn print_partners(partners: &[Partner]) {
    if partners.is_empty() {
        println!("{}", "No partners found.".dimmed());
        return;
    }

    println!("{:<6} {:<30} {:<10} {}", "ID", "Name", "Type", "Contact");
    println!("{}", "─".repeat(75));
    for p in partners {
        println!(
            "{:<6} {} {:<10} {}",
            p.id,
            pad_right(&truncate_visual(&p.name, 30), 30),
            p.partner_type.as_str(),
            first_contact(&p.contact.emails, &p.contact.phones).dimmed()
        );
    }
}

/// Print the dashboard summary.
pub fn print_overview(overview: &Overview, rule: AmpelRule) {
    println!("{}", " LOGISTIKPRO ".on_blue().white().bold());
    println!();

    if overview.total == 0 {
        println!("{}", "No shipments yet. Create one with 'logistik shipment new <transport>'.".dimmed());
        return;
    }

    for entry in &overview.by_status {
        println!(
            "  {} {}",
            pad_right(&entry.status, 14),
            entry.count.to_string().bold()
        );
    }
    println!();
    println!(
        " {} {} shipments {} {} late {}",
        "■".cyan(),
        overview.total.to_string().bold(),
        "·".dimmed(),
        if overview.late > 0 {
            overview.late.to_string().red().bold()
        } else {
            overview.late.to_string().green()
        },
        format!("(ampel: {})", rule.as_str()).dimmed()
    );
}

fn first_contact(emails: &[String], phones: &[String]) -> String {
    emails
        .first()
        .or_else(|| phones.first())
        .cloned()
        .unwrap_or_default()
}

fn money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:>10.2} EUR", v),
        None => format!("{:>10}", "-"),
    }
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_right_uses_visual_width() {
        assert_eq!(pad_right("Köln", 6), "Köln  ");
        assert_eq!(pad_right("Frankfurt", 4), "Frankfurt");
    }

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("Hamburg", 10), "Hamburg");
        assert_eq!(truncate_visual("Rotterdam → Shanghai", 10), "Rotterda..");
        assert_eq!(truncate_visual("abc", 2), "..");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(Some(1234.5)), "   1234.50 EUR");
        assert_eq!(money(None), "         -");
    }

    #[test]
    fn test_first_contact_prefers_email() {
        let emails = vec!["a@b.de".to_string()];
        let phones = vec!["040".to_string()];
        assert_eq!(first_contact(&emails, &phones), "a@b.de");
        assert_eq!(first_contact(&[], &phones), "040");
        assert_eq!(first_contact(&[], &[]), "");
    }
}
