use std::collections::BTreeMap;

use serde::Serialize;

use crate::attributes::{AttributeQuery, Color, Shape, Size};
use crate::config::{SceneConfig, SceneError};

/// One labeled object on the table. Attributes are fixed at construction;
/// only the position changes, and only through [`TableWorld::move_object`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneObject {
    pub id: String,
    pub color: Color,
    pub shape: Shape,
    pub size: Size,
    pub x: i32,
    pub y: i32,
    pub z: u32,
}

impl SceneObject {
    /// Spoken-form rendering used in every response: "<size> <color> <shape>".
    pub fn description(&self) -> String {
        format!("{} {} {}", self.size, self.color, self.shape)
    }
}

/// Authoritative object registry plus the stacking rules that keep per-cell
/// heights dense after every move.
///
/// The backing vector preserves insertion order, which is the enumeration
/// order every query reproduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWorld {
    objects: Vec<SceneObject>,
    width: i32,
    height: i32,
}

impl TableWorld {
    /// The fixed six-object layout every session starts from unless a scene
    /// file overrides it.
    pub fn standard_scene() -> Self {
        let seed: [(&str, Size, Color, Shape, i32, i32, u32); 6] = [
            ("a", Size::Large, Color::Red, Shape::Block, 2, 2, 0),
            ("b", Size::Small, Color::Green, Shape::Block, 3, 2, 0),
            ("c", Size::Small, Color::Blue, Shape::Pyramid, 2, 2, 1),
            ("d", Size::Medium, Color::Yellow, Shape::Block, 5, 5, 0),
            ("e", Size::Large, Color::White, Shape::Box, 1, 1, 0),
            ("f", Size::Small, Color::Green, Shape::Pyramid, 7, 3, 0),
        ];

        let objects = seed
            .into_iter()
            .map(|(id, size, color, shape, x, y, z)| SceneObject {
                id: id.to_string(),
                color,
                shape,
                size,
                x,
                y,
                z,
            })
            .collect();

        TableWorld {
            objects,
            width: 10,
            height: 10,
        }
    }

    /// Build a world from a parsed scene description, rejecting layouts that
    /// would violate the table invariants before any object exists.
    pub fn from_config(config: SceneConfig) -> Result<Self, SceneError> {
        if config.table.width <= 0 || config.table.height <= 0 {
            return Err(SceneError::EmptyTable {
                width: config.table.width,
                height: config.table.height,
            });
        }

        let mut world = TableWorld {
            objects: Vec::with_capacity(config.objects.len()),
            width: config.table.width,
            height: config.table.height,
        };

        for entry in config.objects {
            if entry.id.is_empty() {
                return Err(SceneError::EmptyId);
            }
            if world.objects.iter().any(|object| object.id == entry.id) {
                return Err(SceneError::DuplicateId(entry.id));
            }
            if entry.x < 0 || entry.x >= world.width || entry.y < 0 || entry.y >= world.height {
                return Err(SceneError::OutOfBounds {
                    id: entry.id,
                    x: entry.x,
                    y: entry.y,
                    width: world.width,
                    height: world.height,
                });
            }
            world.objects.push(SceneObject {
                id: entry.id,
                color: entry.color,
                shape: entry.shape,
                size: entry.size,
                x: entry.x,
                y: entry.y,
                z: entry.z,
            });
        }

        for (&(x, y), stack) in &world.cells() {
            for (height, object) in stack.iter().enumerate() {
                if object.z != height as u32 {
                    return Err(SceneError::BadStack { x, y });
                }
            }
        }

        Ok(world)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Every object at a cell, ascending by height.
    pub fn objects_at(&self, x: i32, y: i32) -> Vec<&SceneObject> {
        let mut stack: Vec<&SceneObject> = self
            .objects
            .iter()
            .filter(|object| object.x == x && object.y == y)
            .collect();
        stack.sort_by_key(|object| object.z);
        stack
    }

    pub fn top_object_at(&self, x: i32, y: i32) -> Option<&SceneObject> {
        self.objects_at(x, y).into_iter().last()
    }

    /// Whether a cell can accept another object: in bounds, and the current
    /// top of the stack (if any) is not a pyramid. Read-only; height
    /// assignment happens inside [`TableWorld::move_object`] on confirmed
    /// placement.
    pub fn can_place(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return false;
        }
        match self.top_object_at(x, y) {
            Some(top) => top.shape != Shape::Pyramid,
            None => true,
        }
    }

    /// Move an object to a target cell. Fails without mutating anything
    /// unless the object is topmost at its own cell and the target can
    /// accept it. On success the object lands one above the target's top
    /// and the vacated cell is re-packed to a dense 0..k-1 height range.
    pub fn move_object(&mut self, id: &str, target_x: i32, target_y: i32) -> bool {
        let Some(index) = self.objects.iter().position(|object| object.id == id) else {
            return false;
        };
        let (old_x, old_y) = (self.objects[index].x, self.objects[index].y);

        let is_topmost = self
            .top_object_at(old_x, old_y)
            .map_or(false, |top| top.id == id);
        if !is_topmost {
            return false;
        }

        if !self.can_place(target_x, target_y) {
            return false;
        }

        let new_z = self
            .top_object_at(target_x, target_y)
            .map_or(0, |top| top.z + 1);

        let object = &mut self.objects[index];
        object.x = target_x;
        object.y = target_y;
        object.z = new_z;

        // Also re-packs self-moves, collapsing the z + 1 the object just
        // received back into a dense stack.
        self.repack_cell(old_x, old_y);
        true
    }

    /// All objects matching every present filter, in insertion order. An
    /// empty result is an ordinary answer, not an error.
    pub fn find_matching(&self, query: &AttributeQuery) -> Vec<&SceneObject> {
        self.objects
            .iter()
            .filter(|object| matches_query(query, object))
            .collect()
    }

    /// Human-readable listing of every occupied cell, sorted by (x, y), each
    /// stack rendered bottom-to-top.
    pub fn render_state(&self) -> String {
        let mut lines = vec!["Current world state:".to_string(), "=".repeat(50)];
        for ((x, y), stack) in self.cells() {
            let rendered: Vec<String> = stack.iter().map(|object| object.description()).collect();
            lines.push(format!("Position ({x},{y}): {}", rendered.join(" -> ")));
        }
        lines.join("\n")
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let cells = self
            .cells()
            .into_iter()
            .map(|((x, y), stack)| CellSnapshot {
                x,
                y,
                stack: stack.into_iter().cloned().collect(),
            })
            .collect();

        WorldSnapshot {
            table: TableDimensions {
                width: self.width,
                height: self.height,
            },
            cells,
        }
    }

    fn cells(&self) -> BTreeMap<(i32, i32), Vec<&SceneObject>> {
        let mut cells: BTreeMap<(i32, i32), Vec<&SceneObject>> = BTreeMap::new();
        for object in &self.objects {
            cells.entry((object.x, object.y)).or_default().push(object);
        }
        for stack in cells.values_mut() {
            stack.sort_by_key(|object| object.z);
        }
        cells
    }

    fn repack_cell(&mut self, x: i32, y: i32) {
        let mut indices: Vec<usize> = (0..self.objects.len())
            .filter(|&i| self.objects[i].x == x && self.objects[i].y == y)
            .collect();
        indices.sort_by_key(|&i| self.objects[i].z);
        for (height, i) in indices.into_iter().enumerate() {
            self.objects[i].z = height as u32;
        }
    }
}

fn matches_query(query: &AttributeQuery, object: &SceneObject) -> bool {
    if let Some(color) = query.color {
        if object.color != color {
            return false;
        }
    }
    if let Some(shape) = query.shape {
        if object.shape != shape {
            return false;
        }
    }
    if let Some(size) = query.size {
        if object.size != size {
            return false;
        }
    }
    true
}

/// Serializable listing of the occupied cells, used for `--world-json`.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub table: TableDimensions,
    pub cells: Vec<CellSnapshot>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TableDimensions {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellSnapshot {
    pub x: i32,
    pub y: i32,
    pub stack: Vec<SceneObject>,
}

#[cfg(test)]
mod tests {
    use super::TableWorld;
    use crate::attributes::{AttributeQuery, Color, Shape, Size};

    fn ids(objects: &[&super::SceneObject]) -> Vec<String> {
        objects.iter().map(|object| object.id.clone()).collect()
    }

    #[test]
    fn standard_scene_renders_expected_stacks() {
        let world = TableWorld::standard_scene();
        let rendered = world.render_state();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Current world state:");
        assert_eq!(
            &lines[2..],
            &[
                "Position (1,1): large white box",
                "Position (2,2): large red block -> small blue pyramid",
                "Position (3,2): small green block",
                "Position (5,5): medium yellow block",
                "Position (7,3): small green pyramid",
            ]
        );
    }

    #[test]
    fn buried_object_cannot_move() {
        let mut world = TableWorld::standard_scene();
        let before = world.render_state();

        // "a" carries the blue pyramid "c" at (2,2).
        assert!(!world.move_object("a", 5, 5));
        assert_eq!(world.render_state(), before);
    }

    #[test]
    fn pyramids_support_nothing() {
        let mut world = TableWorld::standard_scene();

        // Top of (2,2) is the pyramid "c", top of (7,3) is the pyramid "f".
        assert!(!world.can_place(2, 2));
        assert!(!world.can_place(7, 3));
        assert!(!world.move_object("b", 2, 2));
        assert!(!world.move_object("d", 7, 3));
    }

    #[test]
    fn placement_is_rejected_outside_the_table() {
        let world = TableWorld::standard_scene();
        assert!(!world.can_place(-1, 0));
        assert!(!world.can_place(0, -1));
        assert!(!world.can_place(10, 0));
        assert!(!world.can_place(0, 10));
        assert!(world.can_place(0, 0));
    }

    #[test]
    fn successful_move_lands_one_above_the_target_top() {
        let mut world = TableWorld::standard_scene();

        assert!(world.move_object("b", 1, 1));
        let stack = world.objects_at(1, 1);
        assert_eq!(ids(&stack), vec!["e", "b"]);
        assert_eq!(stack[1].z, 1);
        assert!(world.objects_at(3, 2).is_empty());
    }

    #[test]
    fn vacated_cell_is_repacked_dense() {
        let mut world = TableWorld::standard_scene();

        // Lift the pyramid off "a", then move "a" away; both source cells
        // must re-pack to contiguous heights.
        assert!(world.move_object("c", 0, 0));
        assert!(world.move_object("a", 5, 5));

        let remaining = world.objects_at(2, 2);
        assert!(remaining.is_empty());

        let stack = world.objects_at(5, 5);
        assert_eq!(ids(&stack), vec!["d", "a"]);
        let heights: Vec<u32> = stack.iter().map(|object| object.z).collect();
        assert_eq!(heights, vec![0, 1]);
    }

    #[test]
    fn stacks_stay_dense_after_a_sequence_of_moves() {
        let mut world = TableWorld::standard_scene();

        assert!(world.move_object("c", 0, 0));
        assert!(world.move_object("b", 2, 2));
        assert!(world.move_object("d", 2, 2));
        assert!(world.move_object("d", 5, 5));

        for object in world.objects().cloned().collect::<Vec<_>>() {
            let heights: Vec<u32> = world
                .objects_at(object.x, object.y)
                .iter()
                .map(|entry| entry.z)
                .collect();
            let expected: Vec<u32> = (0..heights.len() as u32).collect();
            assert_eq!(heights, expected, "cell ({},{})", object.x, object.y);
        }
    }

    #[test]
    fn self_move_keeps_the_stack_unchanged() {
        let mut world = TableWorld::standard_scene();
        let before = world.render_state();

        assert!(world.move_object("b", 3, 2));
        assert_eq!(world.render_state(), before);
        assert_eq!(world.object("b").map(|object| object.z), Some(0));
    }

    #[test]
    fn topmost_pyramid_refuses_its_own_cell() {
        let mut world = TableWorld::standard_scene();

        // A pyramid is its own placement target on a self-move, and pyramids
        // support nothing.
        assert!(!world.move_object("f", 7, 3));
    }

    #[test]
    fn find_matching_with_no_filters_returns_everything() {
        let world = TableWorld::standard_scene();
        let all = world.find_matching(&AttributeQuery::default());
        assert_eq!(ids(&all), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn find_matching_filters_by_single_attribute() {
        let world = TableWorld::standard_scene();

        let greens = world.find_matching(&AttributeQuery {
            color: Some(Color::Green),
            ..AttributeQuery::default()
        });
        assert_eq!(ids(&greens), vec!["b", "f"]);

        let pyramids = world.find_matching(&AttributeQuery {
            shape: Some(Shape::Pyramid),
            ..AttributeQuery::default()
        });
        assert_eq!(ids(&pyramids), vec!["c", "f"]);

        let larges = world.find_matching(&AttributeQuery {
            size: Some(Size::Large),
            ..AttributeQuery::default()
        });
        assert_eq!(ids(&larges), vec!["a", "e"]);
    }

    #[test]
    fn find_matching_combines_filters_conjunctively() {
        let world = TableWorld::standard_scene();

        let matches = world.find_matching(&AttributeQuery {
            color: Some(Color::Green),
            shape: Some(Shape::Pyramid),
            size: None,
        });
        assert_eq!(ids(&matches), vec!["f"]);
    }

    #[test]
    fn snapshot_lists_cells_in_render_order() {
        let world = TableWorld::standard_scene();
        let snapshot = world.snapshot();

        assert_eq!(snapshot.table.width, 10);
        assert_eq!(snapshot.cells.len(), 5);
        assert_eq!((snapshot.cells[0].x, snapshot.cells[0].y), (1, 1));
        let stack_ids: Vec<&str> = snapshot.cells[1]
            .stack
            .iter()
            .map(|object| object.id.as_str())
            .collect();
        assert_eq!(stack_ids, vec!["a", "c"]);
    }
}
