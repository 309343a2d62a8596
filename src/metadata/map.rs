use super::{
    BehaviorMetadata, ExtensionMetadata, InstructionKind, InstructionMetadata, ObjectMetadata,
};
use crate::behavior::{BehaviorKind, MarkerType};

const OBJECT_INCLUDE: &str = "Extensions/Map/mapruntimeobject.js";
const RENDERER_INCLUDE: &str = "Extensions/Map/mapruntimeobject-pixi-renderer.js";
const BEHAVIOR_INCLUDE: &str = "Extensions/Map/mapmarkerbehavior.js";

const CAMERA_ICON: &str = "CppPlatform/Extensions/cameraicon.png";
const VISIBLE_ICON: &str = "CppPlatform/Extensions/visibleicon.png";
const TEXT_ICON: &str = "CppPlatform/Extensions/texticon.png";
const POSITION_ICON: &str = "CppPlatform/Extensions/positionicon.png";

fn marker_type_selector() -> String {
    let names: Vec<String> = MarkerType::ALL
        .iter()
        .map(|t| format!("\"{}\"", t.as_str()))
        .collect();
    format!("[{}]", names.join(", "))
}

fn object_action(
    name: &str,
    full_name: &str,
    description: &str,
    sentence: &str,
    icon: &str,
) -> InstructionMetadata {
    InstructionMetadata::new(
        InstructionKind::Action,
        name,
        full_name,
        description,
        sentence,
        "Map",
        icon,
    )
    .parameter("object", "Map", "Map::Map")
}

fn color_action(
    name: &str,
    full_name: &str,
    description: &str,
    sentence: &str,
    function: &str,
) -> InstructionMetadata {
    object_action(name, full_name, description, sentence, TEXT_ICON)
        .parameter("color", "Color", "")
        .function(function)
        .include_file(OBJECT_INCLUDE)
}

fn object_instructions() -> Vec<InstructionMetadata> {
    vec![
        InstructionMetadata::new(
            InstructionKind::Expression,
            "ZoomLevel",
            "Zoom level",
            "Get the current zoom level.",
            "",
            "Zoom",
            CAMERA_ICON,
        )
        .parameter("object", "Map", "Map::Map")
        .function("getZoomLevel")
        .include_file(OBJECT_INCLUDE)
        .include_file(RENDERER_INCLUDE),
        InstructionMetadata::new(
            InstructionKind::Expression,
            "TrackedCount",
            "Tracked objects count",
            "Get the number of tracked objects.",
            "",
            "Tracking",
            POSITION_ICON,
        )
        .parameter("object", "Map", "Map::Map")
        .optional_parameter("string", "Marker type (optional)", "")
        .function("getTrackedCount")
        .include_file(OBJECT_INCLUDE),
        object_action(
            "SetVisible",
            "Show/hide map",
            "Set the visibility of the map.",
            "Set visibility of _PARAM0_ to _PARAM1_",
            VISIBLE_ICON,
        )
        .parameter("yesorno", "Visible", "")
        .function("setVisible")
        .include_file(OBJECT_INCLUDE),
        object_action("ZoomIn", "Zoom in", "Zoom in the map.", "Zoom in _PARAM0_", CAMERA_ICON)
            .function("zoomIn")
            .include_file(OBJECT_INCLUDE),
        object_action("ZoomOut", "Zoom out", "Zoom out the map.", "Zoom out _PARAM0_", CAMERA_ICON)
            .function("zoomOut")
            .include_file(OBJECT_INCLUDE),
        object_action(
            "SetZoom",
            "Set zoom level",
            "Set the zoom level of the map.",
            "Set zoom level of _PARAM0_ to _PARAM1_",
            CAMERA_ICON,
        )
        .parameter("expression", "Zoom level", "")
        .function("setZoom")
        .include_file(OBJECT_INCLUDE),
        object_action(
            "SetPosition",
            "Set position",
            "Set the position of the map on screen.",
            "Set position of _PARAM0_ to _PARAM1_;_PARAM2_",
            POSITION_ICON,
        )
        .parameter("expression", "X position", "")
        .parameter("expression", "Y position", "")
        .function("setPosition")
        .include_file(OBJECT_INCLUDE),
        object_action(
            "SetSize",
            "Set size",
            "Set the size of the map.",
            "Set size of _PARAM0_ to _PARAM1_",
            "CppPlatform/Extensions/scalewidthicon.png",
        )
        .parameter("expression", "Size", "")
        .function("setSize")
        .include_file(OBJECT_INCLUDE),
        color_action(
            "SetPlayerColor",
            "Set player color",
            "Set the default color used for Player markers.",
            "Set player color of _PARAM0_ to _PARAM1_",
            "setPlayerColor",
        ),
        color_action(
            "SetEnemyColor",
            "Set enemy color",
            "Set the default color used for Enemy markers.",
            "Set enemy color of _PARAM0_ to _PARAM1_",
            "setEnemyColor",
        ),
        color_action(
            "SetItemColor",
            "Set item color",
            "Set the default color used for Item markers.",
            "Set item color of _PARAM0_ to _PARAM1_",
            "setItemColor",
        ),
        color_action(
            "SetObstacleColor",
            "Set obstacle color",
            "Set the default color used for obstacles on the map.",
            "Set obstacle color of _PARAM0_ to _PARAM1_",
            "setObstacleColor",
        ),
        InstructionMetadata::new(
            InstructionKind::Condition,
            "IsVisible",
            "Is visible",
            "Check if the map is visible.",
            "_PARAM0_ is visible",
            "Map",
            VISIBLE_ICON,
        )
        .parameter("object", "Map", "Map::Map")
        .function("isVisible")
        .include_file(OBJECT_INCLUDE),
    ]
}

fn marker_instruction(
    kind: InstructionKind,
    name: &str,
    full_name: &str,
    description: &str,
    sentence: &str,
    icon: &str,
) -> InstructionMetadata {
    InstructionMetadata::new(kind, name, full_name, description, sentence, "Map", icon)
        .parameter("object", "Object", "")
        .parameter("behavior", "Behavior", "MapMarker")
}

fn behavior_instructions() -> Vec<InstructionMetadata> {
    use InstructionKind::{Action, Condition};

    vec![
        marker_instruction(
            Action,
            "ShowOnMap",
            "Show on map",
            "Show the object on the map.",
            "Show _PARAM0_ on map",
            VISIBLE_ICON,
        )
        .function("showOnMap")
        .include_file(BEHAVIOR_INCLUDE),
        marker_instruction(
            Action,
            "HideOnMap",
            "Hide on map",
            "Hide the object from the map.",
            "Hide _PARAM0_ from map",
            VISIBLE_ICON,
        )
        .function("hideOnMap")
        .include_file(BEHAVIOR_INCLUDE),
        marker_instruction(
            Action,
            "SetMarkerType",
            "Set marker type",
            "Set the marker type.",
            "Set marker type of _PARAM0_ to _PARAM2_",
            TEXT_ICON,
        )
        .parameter("stringWithSelector", "Marker type", &marker_type_selector())
        .function("setMarkerType")
        .include_file(BEHAVIOR_INCLUDE),
        marker_instruction(
            Action,
            "Flash",
            "Flash marker",
            "Make the marker flash to attract attention.",
            "Flash marker of _PARAM0_ for _PARAM2_ seconds",
            "CppPlatform/Extensions/particlesystemicon.png",
        )
        .parameter("expression", "Duration (seconds)", "")
        .function("flash")
        .include_file(BEHAVIOR_INCLUDE),
        marker_instruction(
            Condition,
            "IsVisibleOnMap",
            "Is visible on map",
            "Check if the object is visible on the map.",
            "_PARAM0_ is visible on map",
            VISIBLE_ICON,
        )
        .function("isVisibleOnMap")
        .include_file(BEHAVIOR_INCLUDE),
        marker_instruction(
            Condition,
            "MarkerTypeIs",
            "Marker type is",
            "Check the marker type.",
            "Marker type of _PARAM0_ is _PARAM2_",
            TEXT_ICON,
        )
        .parameter("stringWithSelector", "Marker type", &marker_type_selector())
        .function("markerTypeIs")
        .include_file(BEHAVIOR_INCLUDE),
        marker_instruction(
            Condition,
            "IsFlashing",
            "Is flashing",
            "Check if the marker is currently flashing.",
            "Marker of _PARAM0_ is flashing",
            "CppPlatform/Extensions/particlesystemicon.png",
        )
        .function("isFlashing")
        .include_file(BEHAVIOR_INCLUDE),
    ]
}

pub fn declare() -> ExtensionMetadata {
    let map = ObjectMetadata {
        name: "Map::Map".to_string(),
        full_name: "Map".to_string(),
        description: "A map that automatically tracks objects with markers \
                      and displays them on screen."
            .to_string(),
        category: "User interface".to_string(),
        icon: TEXT_ICON.to_string(),
        properties: super::map_object_properties(),
        instructions: object_instructions(),
    };

    let mut marker = BehaviorMetadata::for_kind(
        BehaviorKind::MapMarker,
        "Map Marker",
        "MapMarker",
        "Mark this object to be tracked and displayed on the map.",
        "",
        "CppPlatform/Extensions/draggableicon.png",
    );
    marker.instructions = behavior_instructions();

    ExtensionMetadata {
        name: "Map".to_string(),
        full_name: "Map".to_string(),
        description: "Display a minimap or a world map that tracks objects \
                      marked with the Map Marker behavior."
            .to_string(),
        author: "GDevelop Community".to_string(),
        license: "Open source (MIT License)".to_string(),
        help_path: "/objects/map".to_string(),
        category: "User interface".to_string(),
        tags: vec!["map".to_string(), "minimap".to_string(), "worldmap".to_string()],
        objects: vec![map],
        behaviors: vec![marker],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_lists_every_marker_type() {
        let selector = marker_type_selector();
        for marker_type in MarkerType::ALL {
            assert!(selector.contains(&format!("\"{}\"", marker_type.as_str())));
        }
    }
}
