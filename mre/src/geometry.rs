//! Rectangle équivalent et longueur de recouvrement

use geo::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{BoundingRect, Coord, EuclideanLength, Intersects, Line, MultiPolygon};

use crate::types::ReferenceLine;
use crate::MreError;

/// Bruit numérique toléré sur le discriminant, relatif à p²
const DISCRIMINANT_TOLERANCE: f64 = 1e-9;

/// Écart minimal entre deux coupures d'un même segment (paramètre dans [0, 1])
const PARAMETER_EPSILON: f64 = 1e-12;

/// Petit côté du rectangle de même aire et de même périmètre que le polygone.
///
/// Avec `p = P / 2`, le rectangle de côtés `x` et `p - x` vérifie `x(p - x) = S`.
/// La plus petite racine est `x = (p - sqrt(p² - 4S)) / 2`.
///
/// Un discriminant négatif au-delà du bruit numérique signifie qu'aucun
/// rectangle n'a cette aire et ce périmètre (polygone plus compact qu'un carré,
/// ou auto-intersecté): l'erreur retournée porte un identifiant vide, que
/// l'évaluateur complète avec [`MreError::with_zone`].
pub fn equivalent_half_width(area: f64, perimeter: f64) -> Result<f64, MreError> {
    if !area.is_finite() || !perimeter.is_finite() || area < 0.0 || perimeter < 0.0 {
        return Err(MreError::degenerate("", area, perimeter, f64::NAN));
    }

    let p = perimeter / 2.0;
    let discriminant = p * p - 4.0 * area;

    if discriminant < 0.0 {
        if discriminant < -DISCRIMINANT_TOLERANCE * p * p {
            return Err(MreError::degenerate("", area, perimeter, discriminant));
        }
        return Ok(p / 2.0);
    }

    Ok(((p - discriminant.sqrt()) / 2.0).max(0.0))
}

/// Demi-largeur obtenue en ramenant le discriminant à zéro (carré de même périmètre)
pub fn clamped_half_width(perimeter: f64) -> f64 {
    (perimeter / 4.0).max(0.0)
}

/// Longueur cumulée des lignes de référence contenues dans le polygone.
///
/// Le polygone est fermé: une ligne qui suit son contour (cas usuel, la ligne
/// de référence borde la zone de discrépance) compte au même titre qu'une ligne
/// intérieure. Un simple contact ponctuel ne contribue pas. L'ordre des lignes
/// est sans effet sur le résultat.
pub fn overlap_length(polygon: &MultiPolygon, reference_lines: &[ReferenceLine]) -> f64 {
    let Some(polygon_bbox) = polygon.bounding_rect() else {
        return 0.0;
    };

    let edges: Vec<Line> = polygon
        .iter()
        .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
        .flat_map(|ring| ring.lines())
        .collect();

    reference_lines
        .iter()
        .filter(|line| {
            line.geometry
                .bounding_rect()
                .is_some_and(|bbox| bbox.intersects(&polygon_bbox))
        })
        .flat_map(|line| line.geometry.iter())
        .flat_map(|part| part.lines())
        .filter(|segment| segment.bounding_rect().intersects(&polygon_bbox))
        .map(|segment| covered_length(segment, polygon, &edges))
        .sum()
}

/// Longueur d'un segment située à l'intérieur ou sur le contour du polygone.
///
/// Le segment est découpé à chaque rencontre avec une arête; chaque morceau est
/// entièrement dedans, dehors ou sur une arête, ce que décide son milieu.
fn covered_length(segment: Line, polygon: &MultiPolygon, edges: &[Line]) -> f64 {
    let length = segment.euclidean_length();
    if length == 0.0 {
        return 0.0;
    }

    let mut cuts = vec![0.0, 1.0];
    let mut along_edges: Vec<(f64, f64)> = Vec::new();

    for edge in edges {
        match line_intersection(segment, *edge) {
            Some(LineIntersection::SinglePoint { intersection, .. }) => {
                cuts.push(parameter(segment, intersection));
            }
            Some(LineIntersection::Collinear { intersection }) => {
                let a = parameter(segment, intersection.start);
                let b = parameter(segment, intersection.end);
                cuts.extend([a, b]);
                along_edges.push((a.min(b), a.max(b)));
            }
            None => {}
        }
    }

    cuts.sort_by(f64::total_cmp);
    cuts.dedup_by(|a, b| (*a - *b).abs() < PARAMETER_EPSILON);

    cuts.windows(2)
        .filter(|piece| {
            let mid = (piece[0] + piece[1]) / 2.0;
            along_edges.iter().any(|&(a, b)| a <= mid && mid <= b)
                || polygon.coordinate_position(&point_at(segment, mid)) != CoordPos::Outside
        })
        .map(|piece| (piece[1] - piece[0]) * length)
        .sum()
}

/// Position d'un point sur le segment, ramenée dans [0, 1]
fn parameter(segment: Line, point: Coord) -> f64 {
    let delta = segment.delta();
    let t = ((point.x - segment.start.x) * delta.x + (point.y - segment.start.y) * delta.y)
        / (delta.x * delta.x + delta.y * delta.y);
    t.clamp(0.0, 1.0)
}

fn point_at(segment: Line, t: f64) -> Coord {
    let delta = segment.delta();
    Coord {
        x: segment.start.x + t * delta.x,
        y: segment.start.y + t * delta.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, polygon, MultiLineString};

    fn square(x0: f64, y0: f64, side: f64) -> MultiPolygon {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0),
            (x: x0 + side, y: y0),
            (x: x0 + side, y: y0 + side),
            (x: x0, y: y0 + side),
        ]])
    }

    fn line(id: &str, coords: &[(f64, f64)]) -> ReferenceLine {
        ReferenceLine::from_line_string(id, coords.iter().copied().collect())
    }

    #[test]
    fn test_half_width_of_rectangle_is_short_side() {
        for (a, b) in [(0.05, 100.0), (1.0, 2.0), (3.0, 3.5), (0.2, 0.7)] {
            let x = equivalent_half_width(a * b, 2.0 * (a + b)).unwrap();
            assert!((x - a).abs() < 1e-9, "a={a} b={b} x={x}");
        }
    }

    #[test]
    fn test_half_width_of_square_tolerates_noise() {
        let side: f64 = 0.1;
        let x = equivalent_half_width(side * side * (1.0 + 1e-12), 4.0 * side).unwrap();
        assert!((x - side).abs() < 1e-6);
    }

    #[test]
    fn test_half_width_of_compact_shape_is_degenerate() {
        // Disque de rayon 1: P² < 16 S
        let r: f64 = 1.0;
        let err = equivalent_half_width(std::f64::consts::PI * r * r, 2.0 * std::f64::consts::PI * r)
            .unwrap_err();
        assert!(matches!(err, MreError::DegeneratePolygon { discriminant, .. } if discriminant < 0.0));
    }

    #[test]
    fn test_half_width_rejects_invalid_measures() {
        assert!(equivalent_half_width(-1.0, 4.0).is_err());
        assert!(equivalent_half_width(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_half_width_of_empty_polygon_is_zero() {
        assert_eq!(equivalent_half_width(0.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_clamped_half_width() {
        assert!((clamped_half_width(8.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_of_crossing_line() {
        let poly = square(0.0, 0.0, 10.0);
        let lines = vec![line("l", &[(-5.0, 5.0), (15.0, 5.0)])];
        assert!((overlap_length(&poly, &lines) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_without_intersection_is_zero() {
        let poly = square(0.0, 0.0, 10.0);
        let lines = vec![line("far", &[(20.0, 20.0), (30.0, 30.0)])];
        assert_eq!(overlap_length(&poly, &lines), 0.0);
        assert_eq!(overlap_length(&poly, &[]), 0.0);
    }

    #[test]
    fn test_overlap_of_point_contact_is_zero() {
        let poly = square(0.0, 0.0, 10.0);
        let lines = vec![line("touch", &[(10.0, 10.0), (20.0, 20.0)])];
        assert!(overlap_length(&poly, &lines).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_of_line_on_edge() {
        let poly = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 100.0, y: 0.0),
            (x: 100.0, y: 0.05),
            (x: 0.0, y: 0.05),
        ]]);
        let lines = vec![line("lower", &[(0.0, 0.0), (100.0, 0.0)])];
        assert!((overlap_length(&poly, &lines) - 100.0).abs() < 1e-9);

        // Sens inverse, arête supérieure
        let lines = vec![line("upper", &[(100.0, 0.05), (0.0, 0.05)])];
        assert!((overlap_length(&poly, &lines) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_of_line_partly_along_edge() {
        let poly = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 50.0, y: 0.0),
            (x: 50.0, y: 0.05),
            (x: 0.0, y: 0.05),
        ]]);
        let lines = vec![line("long", &[(-10.0, 0.0), (100.0, 0.0)])];
        assert!((overlap_length(&poly, &lines) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_of_line_along_diagonal_edge() {
        let poly = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 10.0),
        ]]);
        let lines = vec![line("hyp", &[(10.0, 0.0), (0.0, 10.0)])];
        assert!((overlap_length(&poly, &lines) - 200f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_of_line_entering_through_edge() {
        // Le long de l'arête puis à l'intérieur
        let poly = square(0.0, 0.0, 10.0);
        let lines = vec![line("bent", &[(-5.0, 0.0), (5.0, 0.0), (5.0, 5.0), (5.0, 20.0)])];
        assert!((overlap_length(&poly, &lines) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_of_line_on_hole_edge() {
        let poly = MultiPolygon::new(vec![polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 0.0, y: 10.0),
            ],
            interiors: [[
                (x: 4.0, y: 4.0),
                (x: 6.0, y: 4.0),
                (x: 6.0, y: 6.0),
                (x: 4.0, y: 6.0),
            ]],
        )]);
        // Traverse le trou: 4 + 4 dans le polygone, 2 sur l'arête du trou
        let across = vec![line("across", &[(0.0, 5.0), (10.0, 5.0)])];
        assert!((overlap_length(&poly, &across) - 8.0).abs() < 1e-9);
        let rim = vec![line("rim", &[(4.0, 4.0), (6.0, 4.0)])];
        assert!((overlap_length(&poly, &rim) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_is_order_independent() {
        let poly = square(0.0, 0.0, 10.0);
        let a = line("a", &[(-1.0, 2.0), (11.0, 2.0)]);
        let b = line("b", &[(3.0, -1.0), (3.0, 4.0)]);
        let forward = overlap_length(&poly, &[a.clone(), b.clone()]);
        let backward = overlap_length(&poly, &[b, a]);
        assert!((forward - backward).abs() < 1e-9);
        assert!((forward - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_is_split_invariant() {
        let poly = square(0.0, 0.0, 10.0);
        let whole = vec![line("whole", &[(-5.0, 5.0), (15.0, 5.0)])];
        let split = vec![
            line("left", &[(-5.0, 5.0), (4.0, 5.0)]),
            line("right", &[(4.0, 5.0), (15.0, 5.0)]),
        ];
        assert!((overlap_length(&poly, &whole) - overlap_length(&poly, &split)).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_of_multi_line() {
        let poly = square(0.0, 0.0, 10.0);
        let multi = ReferenceLine::new(
            "multi",
            MultiLineString::new(vec![
                line_string![(x: 1.0, y: 1.0), (x: 4.0, y: 1.0)],
                line_string![(x: 1.0, y: 8.0), (x: 1.0, y: 20.0)],
            ]),
        );
        assert!((overlap_length(&poly, &[multi]) - 5.0).abs() < 1e-9);
    }
}
