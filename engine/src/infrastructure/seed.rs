// Copyright (c) 2026 PawSense
// SPDX-License-Identifier: AGPL-3.0

//! Expert-authored seed catalog used to bootstrap an empty store.

use crate::domain::{
    BehaviorPattern, Difficulty, MedicalFlags, Solution, Species, Urgency,
};

pub fn expert_patterns() -> Vec<BehaviorPattern> {
    vec![
        BehaviorPattern::new(
            vec![Species::Cat],
            "hiding",
            "Cat withdraws to enclosed or elevated spots and avoids interaction for \
             extended periods",
        )
        .with_categories(vec!["stress".to_string(), "environment".to_string()])
        .with_keywords(vec![
            "under bed".to_string(),
            "closet".to_string(),
            "won't come out".to_string(),
            "avoids".to_string(),
        ])
        .with_causes(vec![
            "New environment or recent move".to_string(),
            "Loud noises or visitors".to_string(),
            "Illness or pain".to_string(),
        ])
        .with_solutions(vec![
            Solution::expert(
                "Provide a safe retreat and let the cat come out on its own terms",
                0.75,
                Difficulty::Easy,
                vec![
                    "Set up a covered bed in a quiet room".to_string(),
                    "Keep food and litter nearby".to_string(),
                ],
            ),
            Solution::expert(
                "Use synthetic pheromone diffusers near hiding spots",
                0.6,
                Difficulty::Easy,
                vec!["Plug in a diffuser in the room the cat frequents".to_string()],
            ),
        ])
        .with_medical_flags(MedicalFlags {
            needs_vet: false,
            urgency: None,
            red_flags: vec!["Hiding combined with refusing food for over 24h".to_string()],
            related_conditions: vec!["Chronic pain".to_string()],
        })
        .with_prevention_tips(vec![
            "Introduce changes to the household gradually".to_string(),
        ]),
        BehaviorPattern::new(
            vec![Species::Dog],
            "excessive_barking",
            "Dog barks persistently at triggers or for no apparent reason, often when \
             left alone",
        )
        .with_categories(vec!["vocalization".to_string(), "anxiety".to_string()])
        .with_keywords(vec![
            "barking".to_string(),
            "howling".to_string(),
            "alone".to_string(),
            "neighbors complain".to_string(),
        ])
        .with_causes(vec![
            "Separation anxiety".to_string(),
            "Territorial response".to_string(),
            "Boredom and under-stimulation".to_string(),
        ])
        .with_solutions(vec![Solution::expert(
            "Increase daily exercise and mental stimulation",
            0.7,
            Difficulty::Medium,
            vec![
                "Add a long walk before periods alone".to_string(),
                "Rotate puzzle toys".to_string(),
            ],
        )]),
        BehaviorPattern::new(
            vec![Species::Rabbit],
            "thumping",
            "Rabbit stamps hind legs loudly and repeatedly, usually signalling alarm",
        )
        .with_keywords(vec!["stamping".to_string(), "thumps".to_string()])
        .with_causes(vec![
            "Perceived predator or sudden noise".to_string(),
            "Displeasure with handling".to_string(),
        ])
        .with_solutions(vec![Solution::expert(
            "Remove the trigger and give the rabbit a hideout",
            0.65,
            Difficulty::Easy,
            vec!["Add a cardboard hide box".to_string()],
        )]),
        BehaviorPattern::new(
            vec![Species::Bird],
            "feather_plucking",
            "Bird pulls out its own feathers leaving bald patches, often from stress or \
             boredom",
        )
        .with_keywords(vec![
            "bald patches".to_string(),
            "plucking".to_string(),
            "feathers everywhere".to_string(),
        ])
        .with_causes(vec![
            "Chronic stress".to_string(),
            "Skin infection or parasites".to_string(),
        ])
        .with_solutions(vec![Solution::expert(
            "Rule out medical causes, then enrich the cage environment",
            0.55,
            Difficulty::Medium,
            vec![
                "Book an avian vet exam".to_string(),
                "Add foraging toys and vary their placement".to_string(),
            ],
        )])
        .with_medical_flags(MedicalFlags {
            needs_vet: true,
            urgency: Some(Urgency::WithinWeek),
            red_flags: vec!["Broken skin or bleeding".to_string()],
            related_conditions: vec!["Psittacine beak and feather disease".to_string()],
        }),
    ]
}
