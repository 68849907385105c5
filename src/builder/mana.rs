//! Color demand and basic-land color selection.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::BTreeMap;

use crate::models::{Color, ColorSet};

/// Count colored mana symbols across mana cost strings such as `"{2}{G}{G}"`.
/// Hybrid and Phyrexian symbols count toward each color they name.
pub fn pip_demand<'a, I>(mana_costs: I) -> BTreeMap<Color, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut demand = BTreeMap::new();
    for cost in mana_costs {
        for color in Color::ALL {
            let pips = cost.matches(color.symbol()).count();
            if pips > 0 {
                *demand.entry(color).or_insert(0) += pips;
            }
        }
    }
    demand
}

/// Weighted basic-land colors. `None` stands for colorless.
///
/// Uses pip demand when any colored symbol was seen, otherwise one unit per
/// commander color, otherwise a single colorless unit.
pub fn land_color_weights(
    demand: &BTreeMap<Color, usize>,
    commander_colors: ColorSet,
) -> Vec<(Option<Color>, usize)> {
    let weighted: Vec<(Option<Color>, usize)> = demand
        .iter()
        .filter(|&(_, &count)| count > 0)
        .map(|(&color, &count)| (Some(color), count))
        .collect();
    if !weighted.is_empty() {
        return weighted;
    }
    if !commander_colors.is_empty() {
        return commander_colors.iter().map(|c| (Some(c), 1)).collect();
    }
    vec![(None, 1)]
}

/// Draw one basic-land color from the weights.
pub fn choose_land_color<R: Rng + ?Sized>(
    weights: &[(Option<Color>, usize)],
    rng: &mut R,
) -> Option<Color> {
    match WeightedIndex::new(weights.iter().map(|(_, w)| *w)) {
        Ok(dist) => weights[dist.sample(rng)].0,
        Err(_) => weights.first().and_then(|(color, _)| *color),
    }
}
