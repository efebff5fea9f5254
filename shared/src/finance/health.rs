//! Qualitative financial-health verdict
//!
//! A total classification over the net margin: every real input lands in
//! exactly one tier, with boundaries at 30/20/10/0.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FinancialAnalysis;

/// Health tiers, best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Excelente,
    Bueno,
    Regular,
    Malo,
    Critico,
}

impl HealthLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLevel::Excelente => "excelente",
            HealthLevel::Bueno => "bueno",
            HealthLevel::Regular => "regular",
            HealthLevel::Malo => "malo",
            HealthLevel::Critico => "critico",
        }
    }
}

/// The verdict with its tier message and recommendations
#[derive(Debug, Clone, Serialize)]
pub struct FinancialHealth {
    pub level: HealthLevel,
    pub message: String,
    pub recommendations: Vec<String>,
}

/// Classify the business health from the financial statement
pub fn financial_health(analysis: &FinancialAnalysis) -> FinancialHealth {
    let net_margin = analysis.net_margin_percent;
    let roi = analysis.roi_percent;
    let mut recommendations: Vec<String> = Vec::new();

    let (level, message) = if net_margin >= Decimal::from(30) {
        (
            HealthLevel::Excelente,
            "¡Excelente! Tu negocio es muy rentable",
        )
    } else if net_margin >= Decimal::from(20) {
        recommendations.push("Busca oportunidades para aumentar el margen".to_string());
        (HealthLevel::Bueno, "Buen desempeño financiero")
    } else if net_margin >= Decimal::from(10) {
        recommendations.push("Revisa tus gastos operativos".to_string());
        recommendations.push("Considera aumentar precios o reducir costos".to_string());
        (
            HealthLevel::Regular,
            "Margen aceptable, pero hay espacio para mejorar",
        )
    } else if net_margin >= Decimal::ZERO {
        recommendations.push("Urgente: reduce gastos innecesarios".to_string());
        recommendations.push("Analiza qué productos son menos rentables".to_string());
        recommendations.push("Renegocia con proveedores".to_string());
        (HealthLevel::Malo, "Margen bajo, necesitas tomar acción")
    } else {
        recommendations.push("CRÍTICO: Revisa inmediatamente tu estructura de costos".to_string());
        recommendations.push("Considera suspender productos no rentables".to_string());
        recommendations.push("Busca asesoría financiera".to_string());
        (HealthLevel::Critico, "¡Alerta! Estás operando con pérdidas")
    };

    if roi < Decimal::ZERO {
        recommendations.push("ROI negativo: estás perdiendo dinero en tu inversión".to_string());
    } else if roi < Decimal::from(20) {
        recommendations
            .push("ROI bajo: busca formas de mejorar el retorno de inversión".to_string());
    }

    FinancialHealth {
        level,
        message: message.to_string(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(net_margin: i64, roi: i64) -> FinancialAnalysis {
        FinancialAnalysis {
            total_revenue: Decimal::from(100),
            materials_cost: Decimal::ZERO,
            operating_expenses: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            production_cost_of_sales: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            gross_margin_percent: Decimal::ZERO,
            net_margin_percent: Decimal::from(net_margin),
            roi_percent: Decimal::from(roi),
            break_even_units: Decimal::ZERO,
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(financial_health(&analysis(30, 50)).level, HealthLevel::Excelente);
        assert_eq!(financial_health(&analysis(29, 50)).level, HealthLevel::Bueno);
        assert_eq!(financial_health(&analysis(20, 50)).level, HealthLevel::Bueno);
        assert_eq!(financial_health(&analysis(19, 50)).level, HealthLevel::Regular);
        assert_eq!(financial_health(&analysis(10, 50)).level, HealthLevel::Regular);
        assert_eq!(financial_health(&analysis(9, 50)).level, HealthLevel::Malo);
        assert_eq!(financial_health(&analysis(0, 50)).level, HealthLevel::Malo);
        assert_eq!(financial_health(&analysis(-1, 50)).level, HealthLevel::Critico);
    }

    #[test]
    fn test_excellent_tier_has_no_tier_recommendations() {
        let verdict = financial_health(&analysis(40, 50));
        assert!(verdict.recommendations.is_empty());
    }

    #[test]
    fn test_roi_appends_regardless_of_tier() {
        let verdict = financial_health(&analysis(40, -5));
        assert_eq!(verdict.level, HealthLevel::Excelente);
        assert_eq!(verdict.recommendations.len(), 1);
        assert!(verdict.recommendations[0].contains("ROI negativo"));

        let verdict = financial_health(&analysis(40, 10));
        assert_eq!(verdict.recommendations.len(), 1);
        assert!(verdict.recommendations[0].contains("ROI bajo"));
    }

    #[test]
    fn test_critical_tier_collects_both() {
        let verdict = financial_health(&analysis(-20, -10));
        assert_eq!(verdict.level, HealthLevel::Critico);
        assert_eq!(verdict.recommendations.len(), 4);
    }
}
