use crate::format::{PLACEHOLDER, ancient_odds, avg_orbs_display, compact_number, tier_label};
use crate::models::{AncientMeta, UniqueItem};

use super::escape_html;

/// Currency a price line is denominated in.
#[derive(Debug, Clone, Copy)]
enum Orb {
    Chaos,
    Divine,
}

impl Orb {
    fn name(self) -> &'static str {
        match self {
            Self::Chaos => "chaos",
            Self::Divine => "divine",
        }
    }
}

/// Renders a single unique as a card.
pub fn render_card(item: &UniqueItem) -> String {
    let base = &item.base_item;
    let base_name = if base.name.is_empty() {
        "Unknown Base"
    } else {
        base.name.as_str()
    };
    let item_class = if base.item_class.is_empty() {
        "item"
    } else {
        base.item_class.as_str()
    };

    let mut html = String::from("<article class=\"card\">\n");
    html.push_str(&format!(
        "  <header class=\"card-header\"><div class=\"card-title\">{}</div>\
         <div class=\"card-subtitle\">{}</div></header>\n",
        escape_html(&item.name),
        escape_html(base_name)
    ));

    html.push_str("  <div class=\"card-body\">\n");
    html.push_str(&format!(
        "    <div>{}",
        escape_html(&item_class.to_uppercase())
    ));
    if !base.slot.is_empty() {
        html.push_str(&format!(
            " <span class=\"muted\">• {}</span>",
            escape_html(&base.slot.to_uppercase())
        ));
    }
    html.push_str("</div>\n");

    html.push_str("    <div class=\"stats\">\n");
    html.push_str(&format!(
        "      <div>Required Level: {}</div>\n",
        item.required_level
            .map_or_else(|| PLACEHOLDER.to_string(), |level| level.to_string())
    ));
    html.push_str(&price_line(item.chaos_value.as_deref(), Orb::Chaos));
    html.push_str(&price_line(item.divine_value.as_deref(), Orb::Divine));
    html.push_str(&format!(
        "      <div>Listings: {}</div>\n",
        item.listing_count
            .map_or_else(|| PLACEHOLDER.to_string(), |count| count.to_string())
    ));
    html.push_str("    </div>\n");

    if !item.image_url.is_empty() {
        html.push_str(&format!(
            "    <img class=\"icon\" src=\"{}\" alt=\"{}\">\n",
            escape_html(&item.image_url),
            escape_html(&item.name)
        ));
    }

    if let Some(icon_url) = base.icon_url.as_deref().filter(|url| !url.is_empty()) {
        html.push_str(&format!(
            "    <img class=\"base-icon\" src=\"{}\" alt=\"{name}\" title=\"{name}\">\n",
            escape_html(icon_url),
            name = escape_html(base_name)
        ));
    }

    if !item.flavour_text.is_empty() {
        html.push_str(&format!(
            "    <p class=\"flavour\">{}</p>\n",
            escape_html(&item.flavour_text)
        ));
    }

    if let Some(meta) = item.ancient_meta.as_ref().filter(|meta| meta.has_stats()) {
        html.push_str(&ancient_panel(meta));
    }

    html.push_str("  </div>\n</article>\n");
    html
}

/// Price in the given orb, or nothing when the item has no price.
fn price_line(value: Option<&str>, orb: Orb) -> String {
    let Some(value) = value else {
        return String::new();
    };

    format!(
        "      <div class=\"price price-{name}\">{} {name}</div>\n",
        compact_number(value),
        name = orb.name()
    )
}

fn ancient_panel(meta: &AncientMeta) -> String {
    let odds = ancient_odds(meta.chance);

    let mut html = String::from("    <div class=\"ancient\">\n");
    html.push_str(&format!(
        "      <div><span class=\"tier\">{}</span> • Avg: {}</div>\n",
        tier_label(meta.tier),
        avg_orbs_display(meta.avg_orbs)
    ));

    if meta.chance.is_some() {
        html.push_str(&format!("      <div>Chance: {}", odds.percentage));
        if odds.one_in != PLACEHOLDER {
            html.push_str(&format!(
                " <span class=\"muted\">(≈ {})</span>",
                odds.one_in
            ));
        }
        html.push_str("</div>\n");
    } else {
        html.push_str(&format!("      <div>Chance: {PLACEHOLDER}</div>\n"));
    }

    if let Some(min_ilvl) = meta.min_ilvl {
        html.push_str(&format!(
            "      <div class=\"muted\">Min iLvl: {min_ilvl}</div>\n"
        ));
    }

    html.push_str("    </div>\n");
    html
}
