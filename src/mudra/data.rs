//! The basic mudra sequence, in teaching order.

use super::types::Mudra;

pub const BASIC_MUDRAS: &[Mudra] = &[
    Mudra {
        name: "pataka",
        description: "The flag hand gesture - palm stretched flat with all fingers extended",
        key_points: &[
            "Keep all fingers together",
            "Stretch the palm flat",
            "Keep fingers straight",
            "Maintain tension in the hand",
        ],
    },
    Mudra {
        name: "mushti",
        description: "The fist mudra - a closed fist with thumb either tucked in or placed on fingers",
        key_points: &[
            "Close all fingers into a tight fist",
            "Thumb can be tucked inside or placed over fingers",
            "Keep the wrist straight",
            "Maintain a firm grip",
        ],
    },
    Mudra {
        name: "sinhamukh",
        description: "The lion's face - all fingers extended like claws with thumb pointing towards palm",
        key_points: &[
            "Extend and curve all fingers like claws",
            "Point thumb towards the palm",
            "Keep fingers spread apart",
            "Maintain curved tension in fingers",
        ],
    },
    Mudra {
        name: "trishool",
        description: "The trident - middle and ring fingers folded, others extended",
        key_points: &[
            "Extend index finger straight up",
            "Fold middle and ring fingers",
            "Extend little finger",
            "Keep thumb extended at an angle",
        ],
    },
];

pub fn get_mudra(name: &str) -> Option<&'static Mudra> {
    BASIC_MUDRAS.iter().find(|m| m.name == name)
}
