//! Cox-de-Boor-Basisfunktionen (Algorithmen A2.1 und A2.2).
//!
//! Funktioniert für geklemmte und ungeklemmte Knotenvektoren; der gültige
//! Parameterbereich ist immer `[knots[p], knots[n + 1]]`.

/// Sucht den Knotenspann mit `knots[span] <= u < knots[span + 1]`.
///
/// `n` ist der Index des letzten Pols, `p` der Grad. Werte außerhalb des
/// Definitionsbereichs werden auf den ersten bzw. letzten Spann geklemmt.
pub fn find_span(n: usize, p: usize, u: f64, knots: &[f64]) -> usize {
    if u >= knots[n + 1] {
        // Letzten nicht-leeren Spann suchen (Knoten am Ende können mehrfach sein)
        let mut span = n;
        while span > p && knots[span] >= knots[n + 1] {
            span -= 1;
        }
        return span;
    }
    if u <= knots[p] {
        return p;
    }

    let mut low = p;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Wertet die `p + 1` nicht verschwindenden Basisfunktionen im Spann aus.
///
/// Ergebnis: `N[span - p], ..., N[span]`.
pub fn basis_funs(span: usize, u: f64, p: usize, knots: &[f64]) -> Vec<f64> {
    let mut n = vec![0.0; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    n[0] = 1.0;

    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom.abs() > 0.0 { n[r] / denom } else { 0.0 };
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}
