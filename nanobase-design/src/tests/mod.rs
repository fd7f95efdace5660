/*
nanobase, a transactional editing core for DNA nanostructure designs.
    Copyright (C) 2026  The nanobase authors.

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::*;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fwd(design: &Design, h_id: usize, pos: usize) -> BaseId {
    design.helices.get(&h_id).unwrap().pair_at(pos).unwrap().forward
}

fn bwd(design: &Design, h_id: usize, pos: usize) -> BaseId {
    design
        .helices
        .get(&h_id)
        .unwrap()
        .pair_at(pos)
        .unwrap()
        .backward
}

#[test]
fn helix_creation_allocates_pairs() {
    let mut design = Design::new();
    let h = design.add_helix(5, true).unwrap();
    assert_eq!(design.nb_bases(), 10);
    let helix = design.helices.get(&h).unwrap();
    assert_eq!(helix.nb_positions(), 5);
    for pos in 0..5 {
        let pair = helix.pair_at(pos).unwrap();
        let f = design.get_base(pair.forward).unwrap();
        let b = design.get_base(pair.backward).unwrap();
        assert_eq!(f.pair(), Some(pair.backward));
        assert_eq!(b.pair(), Some(pair.forward));
        assert_eq!(f.position(), pos);
        assert_eq!(b.position(), pos);
        assert_eq!(f.side(), HelixSide::Forward);
        assert_eq!(b.side(), HelixSide::Backward);
        assert_eq!(f.helix(), h);
    }
}

#[test]
fn zero_length_helix_is_rejected() {
    let mut design = Design::new();
    assert!(matches!(
        design.add_helix(0, true),
        Err(ErrDesign::ZeroLengthHelix)
    ));
}

#[test]
fn linked_rails_are_chained_antiparallel() {
    let mut design = Design::new();
    let h = design.add_helix(4, true).unwrap();
    // Forward rail runs by increasing position.
    for pos in 0..3 {
        let a = design.get_base(fwd(&design, h, pos)).unwrap();
        assert_eq!(a.forward(), Some(fwd(&design, h, pos + 1)));
    }
    // Backward rail runs by decreasing position.
    for pos in 1..4 {
        let a = design.get_base(bwd(&design, h, pos)).unwrap();
        assert_eq!(a.forward(), Some(bwd(&design, h, pos - 1)));
    }
    // The four rail extremities are unlinked.
    assert!(design.get_base(fwd(&design, h, 3)).unwrap().forward().is_none());
    assert!(design.get_base(fwd(&design, h, 0)).unwrap().backward().is_none());
    assert!(design.get_base(bwd(&design, h, 0)).unwrap().forward().is_none());
    assert!(design.get_base(bwd(&design, h, 3)).unwrap().backward().is_none());
}

#[test]
fn unlinked_helix_has_no_links() {
    let mut design = Design::new();
    let h = design.add_helix(3, false).unwrap();
    for id in design.helices.get(&h).unwrap().bases().collect::<Vec<_>>() {
        let base = design.get_base(id).unwrap();
        assert!(base.forward().is_none());
        assert!(base.backward().is_none());
        assert!(base.pair().is_some());
    }
}

#[test]
fn extend_prime3_links_seam_and_keeps_handles() {
    let mut design = Design::new();
    let h = design.add_helix(3, true).unwrap();
    let old_end = fwd(&design, h, 2);
    let old_first = fwd(&design, h, 0);
    design.extend_helix(h, HelixEnd::Prime3, 2).unwrap();
    assert_eq!(design.helices.get(&h).unwrap().nb_positions(), 5);
    assert_eq!(fwd(&design, h, 0), old_first);
    assert_eq!(fwd(&design, h, 2), old_end);
    // Seam: the old forward end now chains into the first new pair.
    assert_eq!(
        design.get_base(old_end).unwrap().forward(),
        Some(fwd(&design, h, 3))
    );
    // The new end is unlinked.
    assert!(design.get_base(fwd(&design, h, 4)).unwrap().forward().is_none());
    assert!(design.get_base(bwd(&design, h, 4)).unwrap().backward().is_none());
    // The forward rail is a single strand of 5 again.
    assert_eq!(Strand::new(old_first).length(&design), 5);
    assert_eq!(Strand::new(bwd(&design, h, 4)).length(&design), 5);
}

#[test]
fn extend_prime5_renumbers_without_reallocating() {
    let mut design = Design::new();
    let h = design.add_helix(3, true).unwrap();
    let old_first = fwd(&design, h, 0);
    let old_first_bwd = bwd(&design, h, 0);
    design.extend_helix(h, HelixEnd::Prime5, 2).unwrap();
    // The same base now sits at position 2.
    assert_eq!(fwd(&design, h, 2), old_first);
    assert_eq!(design.get_base(old_first).unwrap().position(), 2);
    // Seam on the forward rail: new pair 1 chains into the old first base.
    assert_eq!(
        design.get_base(fwd(&design, h, 1)).unwrap().forward(),
        Some(old_first)
    );
    // Seam on the backward rail: the old 3' end chains into the new run.
    assert_eq!(
        design.get_base(old_first_bwd).unwrap().forward(),
        Some(bwd(&design, h, 1))
    );
    // New 5' end of the forward rail is unlinked backward.
    assert!(design.get_base(fwd(&design, h, 0)).unwrap().backward().is_none());
    assert_eq!(Strand::new(old_first).length(&design), 5);
    assert_eq!(Strand::new(old_first_bwd).length(&design), 5);
}

#[test]
fn extension_seam_respects_existing_crossover() {
    let mut design = Design::new();
    let h1 = design.add_helix(2, true).unwrap();
    let h2 = design.add_helix(2, true).unwrap();
    // Crossover from the forward end of h1 onto the backward rail of h2.
    let end_h1 = fwd(&design, h1, 1);
    let start_h2 = bwd(&design, h2, 1);
    design.set_forward_link(end_h1, start_h2).unwrap();
    design.extend_helix(h1, HelixEnd::Prime3, 1).unwrap();
    // The crossover must survive, the seam stays open on that rail.
    assert_eq!(design.get_base(end_h1).unwrap().forward(), Some(start_h2));
    assert!(design.get_base(fwd(&design, h1, 2)).unwrap().backward().is_none());
}

#[test]
fn strand_traversal_open_chain() {
    let mut design = Design::new();
    let h = design.add_helix(4, true).unwrap();
    let strand = Strand::new(fwd(&design, h, 0));
    let members: Vec<BaseId> = strand.iter_forward(&design).collect();
    assert_eq!(members, (0..4).map(|p| fwd(&design, h, p)).collect::<Vec<_>>());
    let back: Vec<BaseId> = Strand::new(fwd(&design, h, 3)).iter_backward(&design).collect();
    assert_eq!(back, (0..4).rev().map(|p| fwd(&design, h, p)).collect::<Vec<_>>());
    assert!(!strand.is_loop(&design));
}

#[test]
fn loop_detection_from_any_member() {
    let mut design = Design::new();
    let h = design.add_helix(6, true).unwrap();
    let start = fwd(&design, h, 0);
    let end = fwd(&design, h, 5);
    design.set_forward_link(end, start).unwrap();
    for pos in 0..6 {
        let strand = Strand::new(fwd(&design, h, pos));
        assert!(strand.is_loop(&design));
        assert_eq!(strand.length(&design), 6);
        assert_eq!(strand.iter_forward(&design).count(), 6);
        assert_eq!(strand.iter_backward(&design).count(), 6);
    }
    // The backward rail is unaffected.
    assert!(!Strand::new(bwd(&design, h, 0)).is_loop(&design));
}

#[test]
fn contains_searches_both_directions() {
    let mut design = Design::new();
    let h = design.add_helix(5, true).unwrap();
    let middle = Strand::new(fwd(&design, h, 2));
    assert!(middle.contains(&design, fwd(&design, h, 4)));
    assert!(middle.contains(&design, fwd(&design, h, 0)));
    assert!(!middle.contains(&design, bwd(&design, h, 2)));
    assert!(middle.same_strand_as(&design, &Strand::new(fwd(&design, h, 0))));
}

#[test]
fn rewind_finds_the_five_prime_end() {
    let mut design = Design::new();
    let h = design.add_helix(5, true).unwrap();
    assert_eq!(
        Strand::new(fwd(&design, h, 3)).rewind(&design),
        fwd(&design, h, 0)
    );
    // On a loop, rewinding stays at the defining base.
    let start = fwd(&design, h, 0);
    design.set_forward_link(fwd(&design, h, 4), start).unwrap();
    assert_eq!(Strand::new(fwd(&design, h, 3)).rewind(&design), fwd(&design, h, 3));
}

#[test]
fn malformed_links_do_not_hang_traversal() {
    init_logs();
    let mut design = Design::new();
    let h = design.add_helix(3, false).unwrap();
    let a = fwd(&design, h, 0);
    let b = fwd(&design, h, 1);
    let c = fwd(&design, h, 2);
    // Corrupt the graph behind the mutators' back: c enters a two-cycle that
    // never comes back to c.
    design.arena_mut().get_mut(c).unwrap().forward = Some(a);
    design.arena_mut().get_mut(a).unwrap().forward = Some(b);
    design.arena_mut().get_mut(b).unwrap().forward = Some(a);
    let strand = Strand::new(c);
    assert!(strand.iter_forward(&design).count() <= design.nb_bases() + 2);
    assert!(!strand.is_loop(&design));
    assert!(!strand.contains(&design, bwd(&design, h, 0)));
}

#[test]
fn link_mutators_enforce_symmetry() {
    let mut design = Design::new();
    let h = design.add_helix(2, true).unwrap();
    let a = fwd(&design, h, 0);
    let b = fwd(&design, h, 1);
    // a -> b already exists from creation.
    assert!(matches!(
        design.set_forward_link(a, bwd(&design, h, 0)),
        Err(ErrDesign::LinkOccupied { .. })
    ));
    assert!(matches!(
        design.set_forward_link(a, a),
        Err(ErrDesign::SelfLink(_))
    ));
    assert_eq!(design.clear_forward_link(a).unwrap(), Some(b));
    assert!(design.get_base(b).unwrap().backward().is_none());
    // Clearing an unlinked base is a no-op.
    assert_eq!(design.clear_forward_link(a).unwrap(), None);
}

#[test]
fn json_round_trip_preserves_graph() {
    let mut design = Design::new();
    let h = design.add_helix(3, true).unwrap();
    let a = fwd(&design, h, 0);
    design.get_base_mut(a).unwrap().set_label(Label::from_char('G'));
    design.get_base_mut(a).unwrap().set_material(Material(0xff00ff));
    let json = design.to_json().unwrap();
    let reread = Design::from_json(&json).unwrap();
    assert_eq!(reread.nb_bases(), design.nb_bases());
    let base = reread.get_base(a).unwrap();
    assert_eq!(base.label(), Label::G);
    assert_eq!(base.material(), Material(0xff00ff));
    assert_eq!(base.forward(), design.get_base(a).unwrap().forward());
    assert_eq!(
        Strand::new(a).length(&reread),
        Strand::new(a).length(&design)
    );
}

#[test]
fn take_helix_severs_crossovers_both_ways() {
    let mut design = Design::new();
    let h1 = design.add_helix(2, true).unwrap();
    let h2 = design.add_helix(2, true).unwrap();
    let end_h1 = fwd(&design, h1, 1);
    let start_h2 = bwd(&design, h2, 1);
    design.set_forward_link(end_h1, start_h2).unwrap();
    let taken = design.take_helix(h2).unwrap();
    assert_eq!(taken.helix.nb_positions(), 2);
    assert_eq!(taken.bases.len(), 4);
    assert_eq!(taken.severed, vec![(end_h1, start_h2)]);
    assert_eq!(design.nb_bases(), 4);
    assert!(design.get_base(start_h2).is_none());
    // The crossover was severed on the surviving side too.
    assert!(design.get_base(end_h1).unwrap().forward().is_none());
    // Restoring brings the bases and the crossover back.
    design.restore_helix(h2, taken).unwrap();
    assert_eq!(design.nb_bases(), 8);
    assert_eq!(design.get_base(end_h1).unwrap().forward(), Some(start_h2));
    assert_eq!(design.get_base(start_h2).unwrap().backward(), Some(end_h1));
}

#[test]
fn labels_parse_nucleotides_case_insensitively() {
    assert_eq!(Label::from_char('A'), Label::A);
    assert_eq!(Label::from_char('a'), Label::A);
    assert_eq!(Label::from_char('t'), Label::T);
    // Outside the canonical alphabet, the character is kept as written.
    assert_eq!(Label::from_char('x'), Label::Other('x'));
    assert_eq!(Label::from_char('X'), Label::Other('X'));
    assert_eq!(Label::from_char('a').to_char(), Some('A'));
}

#[test]
fn base_names_are_derived() {
    let mut design = Design::new();
    let h = design.add_helix(2, true).unwrap();
    assert_eq!(
        design.base_name(fwd(&design, h, 0)).unwrap(),
        format!("h{}.fwd[0]", h)
    );
    assert_eq!(
        design.base_name(bwd(&design, h, 1)).unwrap(),
        format!("h{}.bwd[1]", h)
    );
}
