//! Headless probe world — статическая геометрия уровня
//!
//! Архитектура:
//! - Solid AABB объёмы (стены, пол, пропасти = отсутствие пола)
//! - Trigger объёмы probe-ами игнорируются (non-trigger geometry only)
//! - Raycast slab method, нормаль = грань входа
//!
//! Probe из внутренности объёма hit НЕ репортит (семантика engine raycast).

use bevy::prelude::*;

/// Быстрый короткий ground probe: «достаточно близко, не паримся»
pub const SHORT_GROUND_PROBE: f32 = 0.2;

/// Длинный ground probe для grounding correction после spawn-jitter
pub const LONG_GROUND_PROBE: f32 = 5.0;

/// Результат probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Точка попадания на поверхности
    pub point: Vec3,
    /// Нормаль грани входа
    pub normal: Vec3,
    /// Дистанция от origin
    pub distance: f32,
}

/// Статический solid объём (AABB)
#[derive(Debug, Clone, Copy)]
pub struct SolidVolume {
    pub min: Vec3,
    pub max: Vec3,
    /// Trigger-объёмы не считаются препятствием
    pub trigger: bool,
}

impl SolidVolume {
    // Строго внутри: точка на грани НЕ внутри, probe с поверхности работает
    fn contains(&self, p: Vec3) -> bool {
        p.x > self.min.x
            && p.x < self.max.x
            && p.y > self.min.y
            && p.y < self.max.y
            && p.z > self.min.z
            && p.z < self.max.z
    }
}

/// Статическая геометрия уровня для probe-запросов
///
/// Заполняется один раз при загрузке уровня (host-плагин/driver), дальше
/// read-only на simulation thread.
#[derive(Resource, Debug, Clone, Default)]
pub struct ProbeWorld {
    volumes: Vec<SolidVolume>,
}

impl ProbeWorld {
    pub fn clear(&mut self) {
        self.volumes.clear();
    }

    pub fn add_solid(&mut self, center: Vec3, half_extents: Vec3) {
        self.volumes.push(SolidVolume {
            min: center - half_extents,
            max: center + half_extents,
            trigger: false,
        });
    }

    pub fn add_trigger(&mut self, center: Vec3, half_extents: Vec3) {
        self.volumes.push(SolidVolume {
            min: center - half_extents,
            max: center + half_extents,
            trigger: true,
        });
    }

    /// Ближайший hit вдоль dir в пределах max_distance (solids only)
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = dir.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut nearest: Option<RayHit> = None;
        for volume in &self.volumes {
            if volume.trigger {
                continue;
            }
            // Ray изнутри объёма — не hit
            if volume.contains(origin) {
                continue;
            }
            let Some(hit) = raycast_aabb(origin, dir, max_distance, volume) else {
                continue;
            };
            if nearest.map_or(true, |best| hit.distance < best.distance) {
                nearest = Some(hit);
            }
        }
        nearest
    }

    /// Probe вниз (grounding correction, forward-ground check)
    pub fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<RayHit> {
        self.raycast(origin, Vec3::NEG_Y, max_distance)
    }

    /// Пересекает ли box хоть один solid non-trigger объём
    ///
    /// Касание гранями не считается пересечением (box, стоящий на полу,
    /// пол не задевает).
    pub fn overlap_box(&self, center: Vec3, half_extents: Vec3) -> bool {
        let min = center - half_extents;
        let max = center + half_extents;
        self.volumes.iter().any(|volume| {
            !volume.trigger
                && min.x < volume.max.x
                && max.x > volume.min.x
                && min.y < volume.max.y
                && max.y > volume.min.y
                && min.z < volume.max.z
                && max.z > volume.min.z
        })
    }
}

/// Slab method для AABB; нормаль — грань входа
fn raycast_aabb(origin: Vec3, dir: Vec3, max_distance: f32, volume: &SolidVolume) -> Option<RayHit> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut entry_axis = 0usize;
    let mut entry_sign = 1.0f32;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (volume.min[axis], volume.max[axis]);

        if d.abs() < 1e-8 {
            // Параллельно слэбу: origin обязан быть внутри
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let mut t1 = (lo - o) / d;
        let mut t2 = (hi - o) / d;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        if t1 > t_near {
            t_near = t1;
            entry_axis = axis;
            // Грань входа: d > 0 — min-грань (нормаль -1), d < 0 — max-грань (+1)
            entry_sign = -d.signum();
        }
        t_far = t_far.min(t2);
        if t_near > t_far {
            return None;
        }
    }

    if t_near < 0.0 || t_near > max_distance {
        return None;
    }

    let mut normal = Vec3::ZERO;
    normal[entry_axis] = entry_sign;

    Some(RayHit {
        point: origin + dir * t_near,
        normal,
        distance: t_near,
    })
}
