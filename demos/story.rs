/// Story example — a small rule set exercising symbols, actions and modifiers.
///
/// Run with: cargo run --example story

use tracery::{Grammar, RuleSet};

const RULES: &str = r#"{
    "origin": "[hero:#name#][pet:#animal#]#intro# #middle# #ending#",
    "intro": "Once there was #hero.a.capitalize# who owned #pet.a#.",
    "middle": [
        "One day the #pet# ran off into the #place#.",
        "Every morning #hero# walked the #pet# to the #place#."
    ],
    "ending": [
        "[place:sea]In the end they both settled by the #place#.",
        "The #pet# never left the #place# again."
    ],
    "name": ["owl", "inventor", "baker"],
    "animal": ["otter", "cat", "eel"],
    "place": ["forest", "market", "harbour"]
}"#;

fn main() {
    let rules = RuleSet::from_json(RULES).expect("Failed to parse story rules");

    let mut grammar = Grammar::builder()
        .seed(2026)
        .with_default_modifiers()
        .rule_set(rules)
        .build();

    println!("=== Three tellings ===\n");
    for i in 1..=3 {
        println!("{}. {}", i, grammar.flatten("#origin#"));
    }

    // State persists between calls: the last hero is still on the stack
    println!("\nLast hero: {}", grammar.flatten("#hero.capitalize#"));

    // Pushed rules stack on top of loaded ones; POP returns to the blend
    grammar.push_rules("place", ["moon"]);
    println!("Pushed:    {}", grammar.flatten("#place#"));
    println!("Popped:    {}", grammar.flatten("[place:POP]#place#"));
}
