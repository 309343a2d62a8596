use super::{BehaviorMetadata, ExtensionMetadata, InstructionKind, InstructionMetadata};
use crate::behavior::BehaviorKind;

const ICON: &str = "res/conditions/3d_box.svg";
const INCLUDE: &str = "Extensions/Sticker3DBehavior/sticker3druntimebehavior.js";

fn instruction(
    kind: InstructionKind,
    name: &str,
    full_name: &str,
    description: &str,
    sentence: &str,
    group: &str,
) -> InstructionMetadata {
    InstructionMetadata::new(kind, name, full_name, description, sentence, group, ICON)
        .parameter("object", "Object", "")
        .parameter("behavior", "Behavior", "Sticker3DBehavior")
}

fn offset_instructions(axis: &str) -> [InstructionMetadata; 2] {
    [
        instruction(
            InstructionKind::Action,
            &format!("SetOffset{axis}"),
            &format!("Set {axis} offset"),
            &format!("Set the {axis} offset from the stuck-to 3D object."),
            &format!("Set {axis} offset of _PARAM0_ to _PARAM2_"),
            "Sticker ❯ Offset",
        )
        .parameter("number", &format!("{axis} offset"), "")
        .function(&format!("setOffset{axis}")),
        instruction(
            InstructionKind::Expression,
            &format!("Offset{axis}"),
            &format!("{axis} offset"),
            &format!("Get the {axis} offset from the stuck-to 3D object."),
            "",
            "Sticker ❯ Offset",
        )
        .function(&format!("getOffset{axis}")),
    ]
}

fn behavior_instructions() -> Vec<InstructionMetadata> {
    use InstructionKind::{Action, Condition};

    let mut instructions = vec![
        instruction(
            Action,
            "StickTo3DObject",
            "Stick to a 3D object",
            "Stick this 3D object to another 3D object. \
             It will follow the position of the 3D object it is stuck to.",
            "Stick _PARAM0_ to _PARAM2_",
            "Sticker",
        )
        .parameter("objectPtr", "3D object to stick to", "")
        .function("stickTo3DObject"),
        instruction(
            Action,
            "Unstick",
            "Unstick from 3D object",
            "Unstick this 3D object from the 3D object it is stuck to.",
            "Unstick _PARAM0_",
            "Sticker",
        )
        .function("unstick"),
        instruction(
            Condition,
            "IsStuck",
            "Is stuck to another 3D object",
            "Check if the 3D object is currently stuck to another 3D object.",
            "_PARAM0_ is stuck to another 3D object",
            "Sticker",
        )
        .function("isStuck"),
    ];
    for axis in ["X", "Y", "Z"] {
        instructions.extend(offset_instructions(axis));
    }
    instructions.extend([
        instruction(
            Action,
            "SetFollowRotation",
            "Follow rotation",
            "Enable or disable rotation following the 3D object it is stuck to.",
            "Set _PARAM0_ to follow rotation: _PARAM2_",
            "Sticker",
        )
        .parameter("yesorno", "Follow rotation", "")
        .function("setFollowRotation"),
        instruction(
            Condition,
            "FollowRotation",
            "Follows rotation",
            "Check if the 3D object follows the rotation of the 3D object it is stuck to.",
            "_PARAM0_ follows rotation",
            "Sticker",
        )
        .function("followsRotation"),
        instruction(
            Action,
            "SetOffsetMode",
            "Offset mode",
            "Choose whether the offset is kept in world axes \
             or rotates with the 3D object it is stuck to.",
            "Set offset mode of _PARAM0_ to _PARAM2_",
            "Sticker ❯ Offset",
        )
        .parameter("stringWithSelector", "Offset mode", "[\"World\", \"Local\"]")
        .function("setOffsetMode"),
        instruction(
            Condition,
            "OffsetModeIs",
            "Offset mode is",
            "Check the offset mode.",
            "Offset mode of _PARAM0_ is _PARAM2_",
            "Sticker ❯ Offset",
        )
        .parameter("stringWithSelector", "Offset mode", "[\"World\", \"Local\"]")
        .function("offsetModeIs"),
        instruction(
            Action,
            "SetDestroyWithStuckToObject",
            "Destroy with stuck-to object",
            "Enable or disable destroying this 3D object \
             when the 3D object it is stuck to is destroyed.",
            "Destroy _PARAM0_ with the object it is stuck to: _PARAM2_",
            "Sticker",
        )
        .parameter("yesorno", "Destroy with stuck-to object", "")
        .function("setDestroyWithStuckToObject"),
    ]);

    instructions
        .into_iter()
        .map(|i| i.include_file(INCLUDE))
        .collect()
}

pub fn declare() -> ExtensionMetadata {
    let mut behavior = BehaviorMetadata::for_kind(
        BehaviorKind::Sticker3D,
        "3D Sticker",
        "Sticker3D",
        "Stick the object to another 3D object so that it follows its position \
         and, optionally, its rotation.",
        "Position",
        ICON,
    );
    behavior.instructions = behavior_instructions();

    ExtensionMetadata {
        name: "Sticker3DBehavior".to_string(),
        full_name: "3D Sticker".to_string(),
        description: "Make 3D objects follow another 3D object.".to_string(),
        author: "GDevelop Community".to_string(),
        license: "Open source (MIT License)".to_string(),
        help_path: "/behaviors/sticker3d".to_string(),
        category: "Movement".to_string(),
        tags: vec!["3d".to_string(), "sticker".to_string(), "attach".to_string()],
        objects: Vec::new(),
        behaviors: vec![behavior],
    }
}
